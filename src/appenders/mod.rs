//! Appender implementations

pub mod callback;
pub mod console;

pub use callback::{CallbackAppender, LogEvent, LogEventHandler};
pub use console::ConsoleAppender;

pub use crate::core::Appender;
