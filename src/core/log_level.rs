//! Log level definitions
//!
//! The numeric values are a wire contract shared with foreign callers and
//! must never be renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire value meaning "inherit the level from the nearest ancestor".
pub const NOT_SET_LEVEL: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum LogLevel {
    Trace = 0,
    Debug = 10000,
    Info = 20000,
    Warn = 30000,
    Error = 40000,
    Fatal = 50000,
    Off = 60000,
}

impl LogLevel {
    /// Alias of [`LogLevel::Trace`]; the lowest threshold.
    pub const ALL: LogLevel = LogLevel::Trace;

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Off => "OFF",
        }
    }

    /// Numeric wire value of this level
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map a wire value back to a level.
    ///
    /// Returns `None` for [`NOT_SET_LEVEL`] and for any value outside the
    /// defined set.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(LogLevel::Trace),
            10000 => Some(LogLevel::Debug),
            20000 => Some(LogLevel::Info),
            30000 => Some(LogLevel::Warn),
            40000 => Some(LogLevel::Error),
            50000 => Some(LogLevel::Fatal),
            60000 => Some(LogLevel::Off),
            _ => None,
        }
    }

    /// Whether a record at `self` passes a logger whose effective level is `threshold`.
    #[inline]
    pub fn passes(self, threshold: LogLevel) -> bool {
        threshold != LogLevel::Off && self != LogLevel::Off && self >= threshold
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal | LogLevel::Off => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" | "ALL" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            "OFF" => Ok(LogLevel::Off),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(LogLevel::Off.code(), 60000);
        assert_eq!(LogLevel::Fatal.code(), 50000);
        assert_eq!(LogLevel::Error.code(), 40000);
        assert_eq!(LogLevel::Warn.code(), 30000);
        assert_eq!(LogLevel::Info.code(), 20000);
        assert_eq!(LogLevel::Debug.code(), 10000);
        assert_eq!(LogLevel::Trace.code(), 0);
        assert_eq!(LogLevel::ALL, LogLevel::Trace);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(LogLevel::from_code(20000), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_code(NOT_SET_LEVEL), None);
        assert_eq!(LogLevel::from_code(25000), None);
    }

    #[test]
    fn test_passes() {
        assert!(LogLevel::Error.passes(LogLevel::Warn));
        assert!(LogLevel::Warn.passes(LogLevel::Warn));
        assert!(!LogLevel::Info.passes(LogLevel::Warn));
        assert!(!LogLevel::Fatal.passes(LogLevel::Off));
        assert!(!LogLevel::Off.passes(LogLevel::Trace));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("All".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
