//! Forwards compiler log events to the `log` facade

use boolexpr_compiler::logging::{LogEvent, LogLevel, Logger};

pub struct LogBridge;

impl LogBridge {
    fn level(level: LogLevel) -> log::Level {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }

    /// Compiler level matching the facade's current maximum
    pub fn min_level() -> LogLevel {
        match log::max_level() {
            log::LevelFilter::Off | log::LevelFilter::Error => LogLevel::Error,
            log::LevelFilter::Warn => LogLevel::Warning,
            log::LevelFilter::Info => LogLevel::Info,
            log::LevelFilter::Debug | log::LevelFilter::Trace => LogLevel::Debug,
        }
    }
}

impl Logger for LogBridge {
    fn log(&self, event: &LogEvent) {
        log::log!(target: "boolexpr_compiler", Self::level(event.level), "{}", event.format());
    }
}
