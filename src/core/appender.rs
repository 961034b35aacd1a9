//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A sink that receives records routed to it by one or more loggers.
///
/// Appenders are shared between loggers as `Arc<dyn Appender>`, so
/// implementations that hold mutable state guard it internally.
pub trait Appender: Send + Sync {
    fn append(&self, entry: &LogEntry) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
