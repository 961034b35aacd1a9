//! # Rust Log Bridge
//!
//! An embeddable hierarchical logging engine whose records can be forwarded
//! to foreign code through a callback appender.
//!
//! ## Features
//!
//! - **Explicit lifecycle**: reference-counted initialize/deinitialize with an
//!   unconditional shutdown
//! - **Logger hierarchy**: dotted names, inherited levels, additive dispatch
//! - **Callback bridge**: every accepted record handed synchronously to a handler
//! - **C ABI**: the same operations exported for managed runtimes
//!
//! ```
//! use rust_log_bridge::prelude::*;
//! use std::sync::Arc;
//!
//! let engine = Engine::new();
//! let token = engine.initialize()?;
//!
//! engine.attach_callback(None, Some(Arc::new(|event: &LogEvent<'_>| {
//!     assert_eq!(event.logger_name, "x.y");
//! })))?;
//! engine.log_str(Some("x.y"), LogLevel::Info.code(), "hello")?;
//!
//! engine.deinitialize(token)?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod ffi;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{CallbackAppender, ConsoleAppender, LogEvent, LogEventHandler};
    pub use crate::config::Configuration;
    pub use crate::core::{
        Appender, Engine, EngineToken, Location, LogEntry, LogLevel, Logger, LoggerError,
        LoggerMetrics, Result,
    };
}

pub use appenders::{CallbackAppender, ConsoleAppender, LogEvent, LogEventHandler};
pub use config::Configuration;
pub use core::{
    status_of, Appender, Engine, EngineToken, Location, LogEntry, LogLevel, Logger, LoggerError,
    LoggerMetrics, Result, DEFAULT_ROOT_LEVEL, NOT_SET_LEVEL, ROOT_LOGGER_NAME, STATUS_OK,
};
