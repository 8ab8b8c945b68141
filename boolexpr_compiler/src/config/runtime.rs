// RUNTIME PREFERENCES (user-tunable, never security bounds)

use crate::logging::events::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Read an environment variable, falling back to `default` when unset or unparsable
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether `!` is accepted as a spelling of NOT
    pub accept_bang_negation: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            accept_bang_negation: env_or(env_vars::LEXICAL_ACCEPT_BANG, true),
            include_position_in_errors: env_or(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingPreferences {
    /// Whether `1` and `0` bind as true and false
    pub accept_numeric_booleans: bool,

    /// Whether whitespace around names and values is trimmed
    pub trim_whitespace: bool,
}

impl Default for BindingPreferences {
    fn default() -> Self {
        Self {
            accept_numeric_booleans: env_or(env_vars::BINDING_ACCEPT_NUMERIC, true),
            trim_whitespace: env_or(env_vars::BINDING_TRIM_WHITESPACE, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationPreferences {
    /// Whether AND/OR stop at the first deciding operand
    pub short_circuit: bool,

    /// Whether parsed trees are cached by normalized text
    pub enable_ast_cache: bool,
}

impl Default for EvaluationPreferences {
    fn default() -> Self {
        Self {
            short_circuit: env_or(env_vars::EVALUATION_SHORT_CIRCUIT, true),
            enable_ast_cache: env_or(env_vars::EVALUATION_AST_CACHE, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of human-readable output
    pub use_structured_logging: bool,

    pub enable_console_logging: bool,

    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.trim().to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub binding: BindingPreferences,
    pub evaluation: EvaluationPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Preferences that reproduce the documented default language exactly,
    /// ignoring the environment
    pub fn strict() -> Self {
        Self {
            lexical: LexicalPreferences {
                accept_bang_negation: true,
                include_position_in_errors: true,
            },
            binding: BindingPreferences {
                accept_numeric_booleans: true,
                trim_whitespace: false,
            },
            evaluation: EvaluationPreferences {
                short_circuit: true,
                enable_ast_cache: false,
            },
            logging: LoggingPreferences {
                use_structured_logging: false,
                enable_console_logging: true,
                min_log_level: LogLevel::Info,
            },
        }
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_ACCEPT_BANG: &str = "BOOLEXPR_LEXICAL_ACCEPT_BANG";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "BOOLEXPR_LEXICAL_INCLUDE_POSITIONS";

    // Binding
    pub const BINDING_ACCEPT_NUMERIC: &str = "BOOLEXPR_BINDING_ACCEPT_NUMERIC";
    pub const BINDING_TRIM_WHITESPACE: &str = "BOOLEXPR_BINDING_TRIM_WHITESPACE";

    // Evaluation
    pub const EVALUATION_SHORT_CIRCUIT: &str = "BOOLEXPR_EVALUATION_SHORT_CIRCUIT";
    pub const EVALUATION_AST_CACHE: &str = "BOOLEXPR_EVALUATION_AST_CACHE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "BOOLEXPR_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "BOOLEXPR_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "BOOLEXPR_LOGGING_MIN_LEVEL";
}
