//! Logging macros for ergonomic log message formatting.
//!
//! Each macro checks the logger's effective level before formatting and
//! records the call site (`file!()`, `module_path!()`, `line!()`) as the
//! record's location.
//!
//! # Examples
//!
//! ```
//! use rust_log_bridge::prelude::*;
//! use rust_log_bridge::info;
//!
//! let engine = Engine::new();
//! let _token = engine.initialize().unwrap();
//! let logger = engine.get_logger("server");
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// ```
/// # use rust_log_bridge::prelude::*;
/// # let engine = Engine::new();
/// # let _token = engine.initialize().unwrap();
/// # let logger = engine.get_logger("app");
/// use rust_log_bridge::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled_for(level) {
            logger.log_at(
                level,
                format!($($arg)+),
                $crate::Location::new(file!(), module_path!(), line!()),
            );
        }
    }};
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// ```
/// # use rust_log_bridge::prelude::*;
/// # let engine = Engine::new();
/// # let _token = engine.initialize().unwrap();
/// # let logger = engine.get_logger("app");
/// use rust_log_bridge::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
