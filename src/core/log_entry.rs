//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Numeric part of `ThreadId`'s debug form, e.g. `ThreadId(7)` -> `7`
fn numeric_thread_id() -> String {
    let raw = format!("{:?}", std::thread::current().id());
    raw.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .to_string()
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(numeric_thread_id)
            .clone()
    })
}

/// Get cached thread name; unnamed threads reuse the id text
fn get_thread_name() -> String {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                std::thread::current()
                    .name()
                    .map(String::from)
                    .unwrap_or_else(get_thread_id)
            })
            .clone()
    })
}

/// Source location attached to a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub function: String,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }
}

/// Immutable record produced by one accepted log call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub logger_name: String,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub thread_id: String,
    pub thread_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl LogEntry {
    pub fn new(logger_name: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Whole seconds since the Unix epoch
    pub fn timestamp_secs(&self) -> u64 {
        u64::try_from(self.timestamp.timestamp()).unwrap_or(0)
    }

    /// Sub-second remainder in microseconds, always within `0..=999_999`
    pub fn timestamp_micros(&self) -> u32 {
        // chrono reports leap seconds as nanos >= 1_000_000_000
        self.timestamp.timestamp_subsec_micros().min(999_999)
    }

    pub fn file(&self) -> &str {
        self.location.as_ref().map_or("", |l| l.file.as_str())
    }

    pub fn function(&self) -> &str {
        self.location.as_ref().map_or("", |l| l.function.as_str())
    }

    pub fn line(&self) -> u32 {
        self.location.as_ref().map_or(0, |l| l.line)
    }
}
