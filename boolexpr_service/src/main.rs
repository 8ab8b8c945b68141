//! `expression-service`: evaluate and manage stored boolean expressions

use boolexpr_compiler::logging::{self, LoggingService};
use boolexpr_service::log_bridge::LogBridge;
use boolexpr_service::{ExpressionService, InMemoryRepository, ServiceError};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "expression-service", version, about = "Evaluate and manage stored boolean expressions")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a definition without storing it
    Eval {
        #[arg(long)]
        definition: String,

        /// Comma-separated name=value pairs
        #[arg(long, default_value = "")]
        values: String,
    },

    /// Evaluate a stored expression
    Run {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        #[arg(long)]
        id: String,

        #[arg(long, default_value = "")]
        values: String,
    },

    /// List stored expressions
    List {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,
    },

    /// Store a new expression
    Create {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        #[arg(long)]
        definition: String,
    },

    /// Replace the definition of a stored expression
    Update {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        #[arg(long)]
        id: String,

        #[arg(long)]
        definition: String,
    },

    /// Remove a stored expression
    Delete {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        #[arg(long)]
        id: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let service = LoggingService::new(Arc::new(LogBridge), LogBridge::min_level());
    if let Err(e) = logging::init_global_logging_with_service(Arc::new(service)) {
        log::warn!("{}", e);
    }
}

fn open_service(store: &Path) -> Result<ExpressionService<InMemoryRepository>, ServiceError> {
    Ok(ExpressionService::new(InMemoryRepository::open(store)?))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ServiceError> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            Ok(())
        }
        Err(e) => Err(boolexpr_service::RepositoryError::storage(e).into()),
    }
}

fn run(command: Command) -> Result<(), ServiceError> {
    match command {
        Command::Eval { definition, values } => {
            let service = ExpressionService::new(InMemoryRepository::new());
            print_json(&service.evaluate_definition(&definition, &values)?)
        }
        Command::Run { store, id, values } => {
            print_json(&open_service(&store)?.execute_expression(&id, &values)?)
        }
        Command::List { store } => print_json(&open_service(&store)?.list_expressions()?),
        Command::Create { store, definition } => {
            print_json(&open_service(&store)?.create_expression(&definition)?)
        }
        Command::Update { store, id, definition } => {
            print_json(&open_service(&store)?.save_expression(&id, &definition)?)
        }
        Command::Delete { store, id } => {
            open_service(&store)?.delete_expression(&id)?;
            log::info!("expression {} deleted", id);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match serde_json::to_string_pretty(&error.report()) {
                Ok(report) => eprintln!("{}", report),
                Err(_) => eprintln!("Error: {}", error),
            }
            ExitCode::FAILURE
        }
    }
}
