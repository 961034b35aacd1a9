//! Console appender implementation

use crate::core::{Appender, LogEntry, LogLevel, Result};
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    show_location: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            show_location: false,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            show_location: false,
        }
    }

    /// Append `file:line` to lines whose record carries a location
    #[must_use]
    pub fn with_location(mut self, show_location: bool) -> Self {
        self.show_location = show_location;
        self
    }

    /// Escape control characters so one record stays on one line
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub(crate) fn format_line(&self, entry: &LogEntry) -> String {
        let level_str = if self.use_colors {
            format!("{:5}", entry.level.to_str())
                .color(entry.level.color_code())
                .to_string()
        } else {
            format!("{:5}", entry.level.to_str())
        };

        let mut line = format!(
            "[{}] [{}] [{}] {} - {}",
            entry.timestamp.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
            level_str,
            entry.thread_name,
            entry.logger_name,
            Self::sanitize_message(&entry.message)
        );

        if self.show_location && entry.location.is_some() {
            line.push_str(&format!(" ({}:{})", entry.file(), entry.line()));
        }

        line
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let output = self.format_line(entry);

        // Route Error and Fatal levels to stderr, others to stdout
        match entry.level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        use std::io::Write;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
