//! Error types for the logging engine

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Status code returned across the C ABI for a successful call.
pub const STATUS_OK: i32 = 0;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The engine could not allocate its process-wide state
    #[error("Logging engine resources exhausted: {0}")]
    ResourceExhausted(String),

    /// Token was never issued or has already been released
    #[error("Engine token {token} is not outstanding")]
    InvalidToken { token: u64 },

    /// More deinitialize calls than initialize calls
    #[error("Engine deinitialized more times than it was initialized")]
    DoubleRelease,

    /// Operation requires a live engine
    #[error("Logging engine is not initialized")]
    NotInitialized,

    /// Malformed configuration document
    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Null or empty callback handler
    #[error("Callback handler must not be null")]
    InvalidHandler,

    /// Null or otherwise unusable required argument
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        LoggerError::ConfigParse {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Integer status reported to foreign callers.
    ///
    /// These values are part of the C ABI and must stay stable.
    pub fn status_code(&self) -> i32 {
        match self {
            LoggerError::ResourceExhausted(_) => 1,
            LoggerError::InvalidToken { .. } => 2,
            LoggerError::DoubleRelease => 3,
            LoggerError::ConfigParse { .. } => 4,
            LoggerError::IoOperation { .. } | LoggerError::IoError(_) => 5,
            LoggerError::InvalidHandler => 6,
            LoggerError::InvalidArgument { .. } => 7,
            LoggerError::NotInitialized => 8,
        }
    }
}

/// Collapse a result into the status code convention of the C ABI.
pub fn status_of<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(e) => e.status_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config_parse("unexpected token");
        assert!(matches!(err, LoggerError::ConfigParse { .. }));

        let err = LoggerError::invalid_argument("logger_name", "must not be null");
        assert!(matches!(err, LoggerError::InvalidArgument { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::InvalidToken { token: 7 };
        assert_eq!(err.to_string(), "Engine token 7 is not outstanding");

        let err = LoggerError::config_parse("missing field `level`");
        assert_eq!(
            err.to_string(),
            "Configuration parse error: missing field `level`"
        );

        let err = LoggerError::invalid_argument("logger_name", "must not be null");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'logger_name': must not be null"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LoggerError::io_operation("reading configuration", "/etc/app.json", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("reading configuration"));
        assert!(err.to_string().contains("/etc/app.json"));
    }

    #[test]
    fn test_status_codes_are_distinct_and_nonzero() {
        let errors = vec![
            LoggerError::ResourceExhausted("tokens".into()),
            LoggerError::InvalidToken { token: 1 },
            LoggerError::DoubleRelease,
            LoggerError::config_parse("x"),
            LoggerError::IoError(std::io::Error::other("x")),
            LoggerError::InvalidHandler,
            LoggerError::invalid_argument("a", "b"),
            LoggerError::NotInitialized,
        ];

        let mut codes: Vec<i32> = errors.iter().map(LoggerError::status_code).collect();
        assert!(codes.iter().all(|&c| c != STATUS_OK));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_status_of() {
        let ok: Result<()> = Ok(());
        assert_eq!(status_of(&ok), STATUS_OK);

        let err: Result<()> = Err(LoggerError::InvalidHandler);
        assert_eq!(status_of(&err), 6);
    }
}
