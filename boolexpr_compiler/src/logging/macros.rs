//! Logging macros: a code, a message, then `"key" => value` context pairs.
//!
//! Values may be any `Display` type and are only formatted once a global
//! logger is installed.

/// Attach context pairs to an event and dispatch it
#[doc(hidden)]
#[macro_export]
macro_rules! __log_event {
    ($event:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut event = $event;
        $(
            event = event.with_context($key, &::std::format!("{}", $value));
        )*
        $crate::logging::dispatch(event)
    }};
}

/// `log_error!(code, message [, span = span] [, "key" => value]*)`
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::is_initialized() {
            $crate::__log_event!(
                $crate::logging::LogEvent::error($code, $crate::logging::config::truncate_message($message))
                    .with_span($span)
                $(, $key => $value)*
            )
        }
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::is_initialized() {
            $crate::__log_event!(
                $crate::logging::LogEvent::error($code, $crate::logging::config::truncate_message($message))
                $(, $key => $value)*
            )
        }
    };
}

/// Success codes are logged at info level
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::is_initialized() {
            $crate::__log_event!(
                $crate::logging::LogEvent::success($code, $crate::logging::config::truncate_message($message))
                $(, $key => $value)*
            )
        }
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::is_initialized() {
            $crate::__log_event!($crate::logging::LogEvent::warning($message) $(, $key => $value)*)
        }
    };
}

/// Stage completions; skipped entirely unless debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::debug_enabled() {
            $crate::__log_event!($crate::logging::LogEvent::debug_with_code($code, $message) $(, $key => $value)*)
        }
    };
}

/// `log_success!` with the elapsed time of `duration` in milliseconds
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::log_success!($code, $message,
            "duration_ms" => ::std::format!("{:.3}", $duration.as_secs_f64() * 1000.0)
            $(, $key => $value)*
        )
    };
}
