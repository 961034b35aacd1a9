//! Callback appender bridge
//!
//! Flattens each record into a [`LogEvent`] of scalar fields and hands it to
//! a caller-supplied handler on the logging thread, before the originating
//! log call returns. Nothing is queued or buffered.

use crate::core::{Appender, LogEntry, Result};
use std::fmt;
use std::sync::Arc;

/// Flat, borrowed view of a record as delivered to a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEvent<'a> {
    pub message: &'a str,
    pub logger_name: &'a str,
    /// Wire value of the record's level
    pub level: i32,
    pub thread_id: &'a str,
    pub thread_name: &'a str,
    pub timestamp_secs: u64,
    pub timestamp_micros: u32,
    /// Empty when no location was captured
    pub file: &'a str,
    /// Empty when no location was captured
    pub function: &'a str,
    pub line: i32,
}

impl<'a> LogEvent<'a> {
    pub fn from_entry(entry: &'a LogEntry) -> Self {
        Self {
            message: &entry.message,
            logger_name: &entry.logger_name,
            level: entry.level.code(),
            thread_id: &entry.thread_id,
            thread_name: &entry.thread_name,
            timestamp_secs: entry.timestamp_secs(),
            timestamp_micros: entry.timestamp_micros(),
            file: entry.file(),
            function: entry.function(),
            line: i32::try_from(entry.line()).unwrap_or(i32::MAX),
        }
    }

    /// Timestamp as fractional seconds since the Unix epoch
    pub fn timestamp_f64(&self) -> f64 {
        self.timestamp_secs as f64 + f64::from(self.timestamp_micros) / 1_000_000.0
    }
}

/// Handler invoked once per record. Caller state ("cookie") travels as
/// whatever the closure captures.
pub type LogEventHandler = Arc<dyn Fn(&LogEvent<'_>) + Send + Sync>;

pub struct CallbackAppender {
    handler: LogEventHandler,
}

impl CallbackAppender {
    pub fn new(handler: LogEventHandler) -> Self {
        Self { handler }
    }

    /// Wrap a closure without building the `Arc` by hand
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(&LogEvent<'_>) + Send + Sync + 'static,
    {
        Self::new(Arc::new(handler))
    }
}

impl fmt::Debug for CallbackAppender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackAppender").finish_non_exhaustive()
    }
}

impl Appender for CallbackAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        // a panicking handler unwinds into the log call
        (self.handler)(&LogEvent::from_entry(entry));
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "callback"
    }
}
