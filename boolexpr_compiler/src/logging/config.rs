//! Logging configuration: compile-time bounds plus runtime preferences
//!
//! Buffer sizes and message limits come from the generated constants and
//! cannot be changed at runtime. Verbosity and output format are user
//! preferences read once at initialization.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences; only the first call takes effect
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    validate_preferences(&preferences)?;

    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

fn validate_preferences(preferences: &LoggingPreferences) -> Result<(), String> {
    if !preferences.enable_console_logging && preferences.use_structured_logging {
        return Err("Structured logging requires console logging to be enabled".to_string());
    }
    Ok(())
}

/// Check the active configuration is usable
pub fn validate_config() -> Result<(), String> {
    validate_preferences(&get_runtime_preferences())?;
    if LOG_BUFFER_SIZE == 0 {
        return Err("LOG_BUFFER_SIZE must be greater than zero".to_string());
    }
    if MAX_LOG_MESSAGE_LENGTH < 16 {
        return Err("MAX_LOG_MESSAGE_LENGTH is too small to be useful".to_string());
    }
    Ok(())
}

pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

/// Level at or above which critical events are always emitted
pub fn get_security_log_level() -> LogLevel {
    match SECURITY_MIN_LOG_LEVEL {
        0 => LogLevel::Error,
        1 => LogLevel::Warning,
        _ => LogLevel::Info,
    }
}

/// Capacity of in-memory log buffers
pub fn get_log_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Cut a message to the configured maximum on a char boundary
pub fn truncate_message(message: &str) -> &str {
    let max = get_max_message_length();
    if message.len() <= max {
        return message;
    }
    let mut end = max;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();
    format!(
        "Logging configuration:\n  min level: {}\n  structured: {}\n  console: {}\n  buffer size: {}\n  max message length: {}\n  security level: {}",
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        LOG_BUFFER_SIZE,
        MAX_LOG_MESSAGE_LENGTH,
        get_security_log_level().as_str(),
    )
}
