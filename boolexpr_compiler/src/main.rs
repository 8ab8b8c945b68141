use boolexpr_compiler::{batch, config, lexical, logging, normalizer, pipeline};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_global_logging()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <expression> [values]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help(&args[0]);
            Ok(())
        }
        "--batch" => {
            let Some(file) = args.get(2) else {
                eprintln!("Error: --batch requires a request file");
                std::process::exit(1);
            };
            run_batch(Path::new(file), &args[3..])
        }
        "--ast" => with_expression(&args, print_ast),
        "--tokens" => with_expression(&args, print_tokens),
        _ => {
            let values = args.get(2).map(String::as_str).unwrap_or("");
            run_single(&args[1], values)
        }
    }
}

fn print_help(program_name: &str) {
    println!("boolexpr v{}", env!("CARGO_PKG_VERSION"));
    println!("Boolean expression compiler and evaluator");
    println!();
    println!("USAGE:");
    println!("    {} <expression> [values]        # Evaluate and print JSON", program_name);
    println!("    {} --ast <expression>           # Print the parsed tree", program_name);
    println!("    {} --tokens <expression>        # Print the token stream", program_name);
    println!("    {} --batch <file> [options]     # Evaluate a JSON-lines request file", program_name);
    println!();
    println!("VALUES:");
    println!("    Comma-separated name=value pairs; values are true/false (any case) or 1/0");
    println!();
    println!("BATCH OPTIONS:");
    println!("    --sequential        Evaluate on the calling thread only");
    println!("    --threads N         Maximum worker threads");
    println!("    --fail-fast         Stop at the first failed request");
    println!();
    println!("EXAMPLES:");
    println!("    {} \"x or y\" \"x=1,y=0\"", program_name);
    println!("    {} --ast \"a and (b or not c)\"", program_name);
    println!();
    println!("CONFIGURATION:");
    println!("    {}", config::build_info::source_info());
    println!("    {}", logging::config::get_config_summary());
}

fn fail(expression: &str, error: &pipeline::PipelineError) -> ! {
    if let pipeline::PipelineError::Parse(parse_error) = error {
        eprint!("{}", parse_error.span().render(expression, &parse_error.to_string()));
    }
    match serde_json::to_string_pretty(&error.report()) {
        Ok(report) => eprintln!("{}", report),
        Err(_) => eprintln!("Error: {}", error),
    }
    std::process::exit(1);
}

fn run_single(expression: &str, values: &str) -> Result<(), Box<dyn std::error::Error>> {
    let evaluator = pipeline::ExpressionEvaluator::from_env();
    match evaluator.evaluate(expression, values) {
        Ok(response) => {
            println!("{}", response.to_json_pretty()?);
            Ok(())
        }
        Err(error) => fail(expression, &error),
    }
}

fn with_expression(
    args: &[String],
    action: fn(&str) -> Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    match args.get(2) {
        Some(expression) => action(expression),
        None => {
            eprintln!("Error: {} requires an expression", args[1]);
            std::process::exit(1);
        }
    }
}

fn print_ast(expression: &str) -> Result<(), Box<dyn std::error::Error>> {
    let evaluator = pipeline::ExpressionEvaluator::from_env();
    match evaluator.compile(expression) {
        Ok(expr) => {
            println!("{}", serde_json::to_string_pretty(expr.as_ref())?);
            println!("canonical: {}", expr);
            println!("variables: {:?}", expr.variables());
            Ok(())
        }
        Err(error) => fail(expression, &error),
    }
}

fn print_tokens(expression: &str) -> Result<(), Box<dyn std::error::Error>> {
    let normalized = normalizer::normalize(expression);
    match lexical::tokenize(normalized.as_str()) {
        Ok(tokens) => {
            for token in tokens.tokens() {
                println!("{:>5}  {:<18} {}", token.span.start.offset, token.value.kind(), token.value);
            }
            let counts: Vec<String> = tokens
                .kind_counts()
                .into_iter()
                .map(|(kind, count)| format!("{kind}={count}"))
                .collect();
            println!("{} tokens ({})", tokens.len(), counts.join(", "));
            Ok(())
        }
        Err(error) => fail(expression, &pipeline::PipelineError::from(error)),
    }
}

fn parse_batch_options(args: &[String]) -> batch::BatchConfig {
    let mut config = batch::BatchConfig::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--sequential" => config.max_threads = 1,
            "--fail-fast" => config.fail_fast = true,
            "--threads" => {
                match args.get(i + 1).map(|n| n.parse::<usize>()) {
                    Some(Ok(threads)) => config.max_threads = threads.max(1),
                    Some(Err(_)) => eprintln!("Warning: Invalid thread count '{}', using default", args[i + 1]),
                    None => eprintln!("Warning: --threads requires a number"),
                }
                i += 1;
            }
            other => eprintln!("Warning: Unknown option '{}'", other),
        }
        i += 1;
    }

    config
}

fn run_batch(file: &Path, options: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_batch_options(options);
    let requests = batch::load_requests(file)?;
    let results = batch::evaluate_batch(requests, &config)?;

    for outcome in &results.outcomes {
        let line = match &outcome.outcome {
            Ok(response) => serde_json::json!({
                "id": outcome.request_id,
                "response": response,
            }),
            Err(error) => serde_json::json!({
                "id": outcome.request_id,
                "error": error.report(),
            }),
        };
        println!("{}", line);
    }
    eprintln!("{}", results.summary());

    if results.failure_count() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
