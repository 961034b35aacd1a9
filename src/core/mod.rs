//! Core engine types and traits

pub mod appender;
pub mod engine;
pub mod error;
pub(crate) mod hierarchy;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;

pub use appender::Appender;
pub use engine::{Engine, EngineToken};
pub use error::{status_of, LoggerError, Result, STATUS_OK};
pub use hierarchy::{DEFAULT_ROOT_LEVEL, ROOT_LOGGER_NAME};
pub use log_entry::{Location, LogEntry};
pub use log_level::{LogLevel, NOT_SET_LEVEL};
pub use logger::Logger;
pub use metrics::LoggerMetrics;
