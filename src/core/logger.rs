//! Named logger handle

use super::{
    appender::Appender,
    engine::Engine,
    error::{LoggerError, Result},
    hierarchy::{Hierarchy, ROOT_LOGGER_NAME},
    log_entry::Location,
    log_level::LogLevel,
};
use std::fmt;
use std::sync::Arc;

/// Lightweight reference to one node of an engine's logger tree
///
/// Cloning is cheap. The handle stays usable across engine teardown: while
/// the engine is not live, logging is a no-op and mutations return
/// [`LoggerError::NotInitialized`].
///
/// # Example
///
/// ```
/// use rust_log_bridge::prelude::*;
///
/// let engine = Engine::new();
/// let token = engine.initialize()?;
///
/// let logger = engine.get_logger("app.db");
/// logger.set_level(Some(LogLevel::Warn))?;
/// logger.info("filtered out");
/// logger.error("dispatched");
///
/// engine.deinitialize(token)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    engine: Engine,
    name: String,
}

impl Logger {
    pub(crate) fn new(engine: Engine, name: &str) -> Self {
        Self {
            engine,
            name: name.to_string(),
        }
    }

    /// Logger name; `"root"` for the root logger
    pub fn name(&self) -> &str {
        if self.is_root() {
            ROOT_LOGGER_NAME
        } else {
            &self.name
        }
    }

    pub fn is_root(&self) -> bool {
        Hierarchy::is_root(&self.name)
    }

    /// Parent logger, derived by dropping the last dot-separated segment
    pub fn parent(&self) -> Option<Logger> {
        if self.is_root() {
            return None;
        }
        let parent = self.name.rfind('.').map_or("", |idx| &self.name[..idx]);
        Some(Logger::new(self.engine.clone(), parent))
    }

    /// Explicitly assigned level; `None` means inherited
    pub fn level(&self) -> Option<LogLevel> {
        self.engine
            .with_hierarchy(|h| h.node(&self.name).and_then(|node| node.level))
            .flatten()
    }

    /// Assign or clear this logger's own level. Root always keeps a
    /// concrete level, so clearing it is rejected.
    pub fn set_level(&self, level: Option<LogLevel>) -> Result<()> {
        if level.is_none() && self.is_root() {
            return Err(LoggerError::invalid_argument(
                "level",
                "the root logger cannot inherit a level",
            ));
        }
        self.engine
            .with_hierarchy_mut(|h| h.node_mut(&self.name).level = level)
    }

    /// Level actually applied to records logged here
    pub fn effective_level(&self) -> Option<LogLevel> {
        self.engine.with_hierarchy(|h| h.effective_level(&self.name))
    }

    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        self.effective_level()
            .is_some_and(|threshold| level.passes(threshold))
    }

    pub fn additivity(&self) -> bool {
        self.engine
            .with_hierarchy(|h| h.node(&self.name).map_or(true, |node| node.additive))
            .unwrap_or(true)
    }

    /// When disabled, records logged here skip ancestor appenders
    pub fn set_additivity(&self, additive: bool) -> Result<()> {
        self.engine
            .with_hierarchy_mut(|h| h.node_mut(&self.name).additive = additive)
    }

    pub fn add_appender(&self, appender: Arc<dyn Appender>) -> Result<()> {
        self.engine.add_appender(&self.name, appender)
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.engine.log(&self.name, level, message, None);
    }

    /// Log with a source location, as the logging macros do
    pub fn log_at(&self, level: LogLevel, message: impl Into<String>, location: Location) {
        self.engine.log(&self.name, level, message, Some(location));
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::{CallbackAppender, LogEvent};
    use parking_lot::Mutex;

    fn recording(logger: &Logger) -> Arc<Mutex<Vec<(String, i32)>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        logger
            .add_appender(Arc::new(CallbackAppender::from_fn(move |e: &LogEvent<'_>| {
                sink.lock().push((e.message.to_string(), e.level));
            })))
            .unwrap();
        seen
    }

    #[test]
    fn test_names_and_parents() {
        let engine = Engine::new();
        let _token = engine.initialize().unwrap();

        let logger = engine.get_logger("a.b.c");
        assert_eq!(logger.name(), "a.b.c");
        assert_eq!(logger.parent().unwrap().name(), "a.b");
        assert!(engine.get_logger("a").parent().unwrap().is_root());
        assert_eq!(engine.root_logger().name(), "root");
        assert!(engine.root_logger().parent().is_none());
    }

    #[test]
    fn test_level_inheritance() {
        let engine = Engine::new();
        let _token = engine.initialize().unwrap();

        engine.get_logger("a").set_level(Some(LogLevel::Warn)).unwrap();
        let child = engine.get_logger("a.b");

        assert_eq!(child.level(), None);
        assert_eq!(child.effective_level(), Some(LogLevel::Warn));
        assert!(!child.is_enabled_for(LogLevel::Info));
        assert!(child.is_enabled_for(LogLevel::Error));
    }

    #[test]
    fn test_root_cannot_be_unset() {
        let engine = Engine::new();
        let _token = engine.initialize().unwrap();
        assert!(engine.root_logger().set_level(None).is_err());
        assert!(engine.root_logger().level().is_some());
    }

    #[test]
    fn test_filtering_and_convenience_methods() {
        let engine = Engine::new();
        let _token = engine.initialize().unwrap();
        let logger = engine.get_logger("svc");
        logger.set_level(Some(LogLevel::Info)).unwrap();
        let seen = recording(&logger);

        logger.trace("t");
        logger.debug("d");
        logger.info("i");
        logger.warn("w");
        logger.error("e");
        logger.fatal("f");

        let levels: Vec<i32> = seen.lock().iter().map(|(_, l)| *l).collect();
        assert_eq!(levels, vec![20000, 30000, 40000, 50000]);
    }

    #[test]
    fn test_off_silences_logger() {
        let engine = Engine::new();
        let _token = engine.initialize().unwrap();
        let logger = engine.get_logger("quiet");
        logger.set_level(Some(LogLevel::Off)).unwrap();
        let seen = recording(&logger);

        logger.fatal("nothing");
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_additivity_toggle() {
        let engine = Engine::new();
        let _token = engine.initialize().unwrap();
        let root_seen = recording(&engine.root_logger());
        let logger = engine.get_logger("isolated");
        assert!(logger.additivity());

        logger.set_additivity(false).unwrap();
        logger.info("m");
        assert!(root_seen.lock().is_empty());

        logger.set_additivity(true).unwrap();
        logger.info("m");
        assert_eq!(root_seen.lock().len(), 1);
    }

    #[test]
    fn test_handle_after_teardown() {
        let engine = Engine::new();
        let token = engine.initialize().unwrap();
        let logger = engine.get_logger("late");
        engine.deinitialize(token).unwrap();

        logger.info("ignored");
        assert_eq!(logger.effective_level(), None);
        assert!(matches!(
            logger.set_level(Some(LogLevel::Info)),
            Err(LoggerError::NotInitialized)
        ));
    }
}
