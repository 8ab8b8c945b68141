// build.rs - TOML-driven generation of compile-time limits
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    binding: BindingLimits,
    evaluation: EvaluationLimits,
    batch: BatchLimits,
    cache: CacheLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_expression_length: usize,
    max_identifier_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
}

#[derive(serde::Deserialize)]
struct BindingLimits {
    max_parameter_string_length: usize,
    max_bindings: usize,
}

#[derive(serde::Deserialize)]
struct EvaluationLimits {
    max_evaluation_depth: usize,
}

#[derive(serde::Deserialize)]
struct BatchLimits {
    max_worker_threads: usize,
    max_requests_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct CacheLimits {
    max_cached_expressions: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=BOOLEXPR_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=BOOLEXPR_CONFIG_DIR");

    let profile = env::var("BOOLEXPR_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("BOOLEXPR_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the compiler crate
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_security_constraints(&config, &profile);
    generate_constants(&config, &profile, &config_path);
}

fn validate_security_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_EXPRESSION_LENGTH: usize = 1_048_576;
    const ABSOLUTE_MAX_PARSE_DEPTH: usize = 1024;
    const ABSOLUTE_MAX_WORKER_THREADS: usize = 256;

    if config.lexical.max_expression_length > ABSOLUTE_MAX_EXPRESSION_LENGTH {
        panic!("SECURITY: max_expression_length exceeds absolute maximum");
    }

    // Recursive descent runs on the caller's stack
    if config.syntax.max_parse_depth > ABSOLUTE_MAX_PARSE_DEPTH {
        panic!("SECURITY: max_parse_depth exceeds absolute maximum");
    }

    if config.evaluation.max_evaluation_depth < config.syntax.max_parse_depth {
        panic!("CONFIG: max_evaluation_depth must be at least max_parse_depth");
    }

    if config.batch.max_worker_threads == 0
        || config.batch.max_worker_threads > ABSOLUTE_MAX_WORKER_THREADS
    {
        panic!("SECURITY: max_worker_threads must be between 1 and 256");
    }

    if config.lexical.max_identifier_length == 0 || config.lexical.max_token_count == 0 {
        panic!("CONFIG: lexical limits must be non-zero");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("SECURITY: security_min_log_level too high (max: 2)");
    }

    if profile == "production" && config.lexical.max_expression_length > 65_536 {
        panic!("PRODUCTION: max_expression_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str, source: &Path) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time limits
// Profile: {profile}
// DO NOT EDIT - Generated by build.rs

pub const BUILD_PROFILE: &str = "{profile}";
pub const CONFIG_SOURCE: &str = {source:?};

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_EXPRESSION_LENGTH: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_PARSE_DEPTH: usize = {};
    }}

    pub mod binding {{
        pub const MAX_PARAMETER_STRING_LENGTH: usize = {};
        pub const MAX_BINDINGS: usize = {};
    }}

    pub mod evaluation {{
        pub const MAX_EVALUATION_DEPTH: usize = {};
    }}

    pub mod batch {{
        pub const MAX_WORKER_THREADS: usize = {};
        pub const MAX_REQUESTS_PER_BATCH: usize = {};
    }}

    pub mod cache {{
        pub const MAX_CACHED_EXPRESSIONS: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        config.lexical.max_expression_length,
        config.lexical.max_identifier_length,
        config.lexical.max_token_count,
        config.syntax.max_parse_depth,
        config.binding.max_parameter_string_length,
        config.binding.max_bindings,
        config.evaluation.max_evaluation_depth,
        config.batch.max_worker_threads,
        config.batch.max_requests_per_batch,
        config.cache.max_cached_expressions,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.security_min_log_level,
        profile = profile,
        source = source.display().to_string(),
    );

    fs::write(output_path, constants_code).unwrap();
}
