//! Engine metrics for observability
//!
//! Counters describing how many records the engine accepted, filtered out,
//! or failed to deliver to an appender.

use std::sync::atomic::{AtomicU64, Ordering};

/// Dispatch counters for one engine
///
/// # Example
///
/// ```
/// use rust_log_bridge::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.dispatched_count(), 1);
/// assert_eq!(metrics.filtered_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records that passed level filtering and were handed to appenders
    dispatched: AtomicU64,

    /// Log calls dropped by level filtering or an unknown level
    filtered: AtomicU64,

    /// Appender `append` calls that returned an error
    appender_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            appender_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_failures(&self) -> u64 {
        self.appender_failures.load(Ordering::Relaxed)
    }

    /// Record a dispatched entry, returning the previous count
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appender_failure(&self) -> u64 {
        self.appender_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of log calls that were filtered, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged.
    pub fn filter_rate(&self) -> f64 {
        let filtered = self.filtered_count() as f64;
        let total = self.dispatched_count() as f64 + filtered;
        if total == 0.0 {
            0.0
        } else {
            (filtered / total) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.appender_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched_count()),
            filtered: AtomicU64::new(self.filtered_count()),
            appender_failures: AtomicU64::new(self.appender_failures()),
        }
    }
}
