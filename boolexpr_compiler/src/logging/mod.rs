//! Global logging for the expression pipeline
//!
//! The pipeline itself holds no logging state: events go to a process-wide
//! sink that only the outermost binary installs. Until then every macro is a
//! no-op, so library callers and tests see pure functions.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static EVALUATION_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the configured global logger
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());
    init_global_logging_with_service(logging_service.clone())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));
    if logging_service.min_level() >= LogLevel::Debug {
        logging_service.log_event(LogEvent::debug(&config::get_config_summary()));
    }
    Ok(())
}

/// Install a specific service (tests, embedding applications)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether debug events would reach a logger
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.min_level() >= LogLevel::Debug)
        .unwrap_or(false)
}

// ============================================================================
// EVALUATION CONTEXT
// ============================================================================

/// Run `f` with every event on this thread tagged with `request_id`
pub fn with_evaluation_context<F, R>(request_id: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = EVALUATION_CONTEXT.with(|ctx| ctx.replace(Some(request_id.to_string())));
    let result = f();
    EVALUATION_CONTEXT.with(|ctx| *ctx.borrow_mut() = previous);
    result
}

pub fn get_current_evaluation_context() -> Option<String> {
    EVALUATION_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Tag with the evaluation context and hand to the global logger, if any;
/// every logging macro ends here
pub fn dispatch(event: LogEvent) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    let event = match get_current_evaluation_context() {
        Some(request) => event.with_context("request", &request),
        None => event,
    };
    logger.log_event(event);
}

/// Error logging that falls back to stderr when no logger is installed
pub fn safe_log_error(code: Code, message: &str) {
    match try_get_global_logger() {
        Some(logger) => logger.log_error(code, message),
        None => eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_context_nests_and_restores() {
        assert!(get_current_evaluation_context().is_none());

        let inner = with_evaluation_context("outer", || {
            with_evaluation_context("inner", get_current_evaluation_context)
        });
        assert_eq!(inner.as_deref(), Some("inner"));

        let outer = with_evaluation_context("outer", get_current_evaluation_context);
        assert_eq!(outer.as_deref(), Some("outer"));
        assert!(get_current_evaluation_context().is_none());
    }

    #[test]
    fn test_macros_are_safe_without_logger() {
        // Other tests in this binary never install a global logger
        crate::log_error!(codes::syntax::UNEXPECTED_TOKEN, "no sink", "position" => 3);
        crate::log_success!(codes::success::PARSE_COMPLETE, "no sink");
        crate::log_warning!("no sink", "k" => "v");
        crate::log_performance!(codes::success::BATCH_COMPLETE, "no sink",
            duration = std::time::Duration::from_millis(3),
            "requests" => 1
        );
        crate::log_debug!(codes::success::BINDING_COMPLETE, "no sink", "count" => 2);
        safe_log_error(codes::system::INTERNAL_ERROR, "fallback path");
        assert!(!debug_enabled() || is_initialized());
    }
}
