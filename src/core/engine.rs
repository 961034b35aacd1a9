//! Logging engine handle
//!
//! An [`Engine`] owns the logger hierarchy between the first successful
//! [`Engine::initialize`] and the matching last [`Engine::deinitialize`].
//! Handles are cheap to clone and all share the same state.
//!
//! Lock order: `lifecycle` before `hierarchy`. Appenders are always invoked
//! after the hierarchy lock is released, so a handler may log again or
//! attach further appenders without deadlocking.
//!
//! Every `log` call holds the dispatch gate shared (recursively) for its
//! whole duration. Teardown takes it exclusively after detaching the
//! hierarchy, so once `shutdown` or the last `deinitialize` returns no
//! appender of the retired hierarchy is still running.

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    hierarchy::{Hierarchy, ROOT_LOGGER_NAME},
    log_entry::{LogEntry, Location},
    log_level::LogLevel,
    logger::Logger,
    metrics::LoggerMetrics,
};
use crate::appenders::{CallbackAppender, ConsoleAppender, LogEventHandler};
use crate::config::Configuration;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

static GLOBAL_ENGINE: Lazy<Engine> = Lazy::new(Engine::new);

thread_local! {
    /// Engines this thread is currently dispatching for, by address
    static DISPATCHING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Shared hold on an engine's dispatch gate for the length of one `log` call
struct DispatchScope<'a> {
    engine: usize,
    _gate: RwLockReadGuard<'a, ()>,
}

impl<'a> DispatchScope<'a> {
    fn enter(inner: &'a EngineInner) -> Self {
        // recursive so a handler that logs cannot queue behind a waiting teardown
        let gate = inner.dispatch_gate.read_recursive();
        let engine = inner as *const EngineInner as usize;
        DISPATCHING.with(|active| active.borrow_mut().push(engine));
        Self {
            engine,
            _gate: gate,
        }
    }

    fn is_active(inner: &EngineInner) -> bool {
        let engine = inner as *const EngineInner as usize;
        DISPATCHING.with(|active| active.borrow().contains(&engine))
    }
}

impl Drop for DispatchScope<'_> {
    fn drop(&mut self) {
        DISPATCHING.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|&e| e == self.engine) {
                active.remove(pos);
            }
        });
    }
}

/// Proof of one successful [`Engine::initialize`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineToken(u64);

impl EngineToken {
    /// Raw value for handing across an FFI boundary; never zero
    pub fn as_raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

struct Lifecycle {
    outstanding: HashSet<u64>,
    next_token: u64,
}

struct EngineInner {
    lifecycle: Mutex<Lifecycle>,
    hierarchy: RwLock<Option<Hierarchy>>,
    dispatch_gate: RwLock<()>,
    metrics: LoggerMetrics,
}

#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Create an independent engine. It is not live until initialized.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EngineInner {
                lifecycle: Mutex::new(Lifecycle {
                    outstanding: HashSet::new(),
                    next_token: 1,
                }),
                hierarchy: RwLock::new(None),
                dispatch_gate: RwLock::new(()),
                metrics: LoggerMetrics::new(),
            }),
        }
    }

    /// The process-wide engine used by the C ABI
    pub fn global() -> &'static Engine {
        &GLOBAL_ENGINE
    }

    /// Take a reference on the engine, creating the hierarchy on the first one
    pub fn initialize(&self) -> Result<EngineToken> {
        let mut lifecycle = self.inner.lifecycle.lock();

        let id = lifecycle.next_token;
        let next = id
            .checked_add(1)
            .ok_or_else(|| LoggerError::ResourceExhausted("engine tokens".to_string()))?;

        if lifecycle.outstanding.is_empty() {
            let mut hierarchy = self.inner.hierarchy.write();
            if hierarchy.is_none() {
                *hierarchy = Some(Hierarchy::new());
            }
        }

        lifecycle.next_token = next;
        lifecycle.outstanding.insert(id);
        Ok(EngineToken(id))
    }

    /// Release a reference; the last one tears the hierarchy down
    pub fn deinitialize(&self, token: EngineToken) -> Result<()> {
        let retired = {
            let mut lifecycle = self.inner.lifecycle.lock();
            if lifecycle.outstanding.is_empty() {
                return Err(LoggerError::DoubleRelease);
            }
            if !lifecycle.outstanding.remove(&token.0) {
                return Err(LoggerError::InvalidToken { token: token.0 });
            }
            if lifecycle.outstanding.is_empty() {
                self.inner.hierarchy.write().take()
            } else {
                None
            }
        };

        if let Some(hierarchy) = retired {
            self.close(hierarchy);
        }
        Ok(())
    }

    /// Tear down regardless of outstanding references. Never fails.
    pub fn shutdown(&self) {
        let retired = {
            let mut lifecycle = self.inner.lifecycle.lock();
            lifecycle.outstanding.clear();
            self.inner.hierarchy.write().take()
        };

        if let Some(hierarchy) = retired {
            self.close(hierarchy);
        }
    }

    /// Wait out in-flight dispatches, then flush and drop every appender.
    ///
    /// A handler tearing down the engine it is dispatching for cannot wait
    /// for itself; in that case only the other threads' dispatches are not
    /// awaited.
    fn close(&self, hierarchy: Hierarchy) {
        if !DispatchScope::is_active(&self.inner) {
            drop(self.inner.dispatch_gate.write());
        }
        for appender in hierarchy.all_appenders() {
            if let Err(e) = appender.flush() {
                eprintln!(
                    "[LOGGER ERROR] Appender '{}' flush failed during teardown: {}",
                    appender.name(),
                    e
                );
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.inner.hierarchy.read().is_some()
    }

    /// Number of outstanding tokens
    pub fn ref_count(&self) -> usize {
        self.inner.lifecycle.lock().outstanding.len()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    /// Run `f` against the live hierarchy under the exclusive lock
    pub(crate) fn with_hierarchy_mut<T>(&self, f: impl FnOnce(&mut Hierarchy) -> T) -> Result<T> {
        let mut guard = self.inner.hierarchy.write();
        let hierarchy = guard.as_mut().ok_or(LoggerError::NotInitialized)?;
        Ok(f(hierarchy))
    }

    /// Run `f` against the live hierarchy under the shared lock
    pub(crate) fn with_hierarchy<T>(&self, f: impl FnOnce(&Hierarchy) -> T) -> Option<T> {
        self.inner.hierarchy.read().as_ref().map(f)
    }

    /// Apply a configuration file. A missing or unreadable file, or a
    /// malformed document, leaves the current tree untouched.
    pub fn configure_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_live()?;
        let config = Configuration::from_file(path)?;
        self.apply(&config)
    }

    /// Apply a configuration document held in memory, all or nothing
    pub fn configure_from_str(&self, text: &str) -> Result<()> {
        self.ensure_live()?;
        let config = Configuration::parse(text)?;
        self.apply(&config)
    }

    pub fn apply(&self, config: &Configuration) -> Result<()> {
        self.with_hierarchy_mut(|hierarchy| config.apply(hierarchy))
    }

    /// Install one console appender on root and reset root to DEBUG
    pub fn configure_basic(&self) -> Result<()> {
        self.with_hierarchy_mut(|hierarchy| {
            let root = hierarchy.node_mut("");
            root.level = Some(LogLevel::Debug);
            root.appenders.push(Arc::new(ConsoleAppender::new()));
        })
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_live() {
            Ok(())
        } else {
            Err(LoggerError::NotInitialized)
        }
    }

    /// Handle for the named logger, materializing it if the engine is live.
    /// An empty name designates root.
    pub fn get_logger(&self, name: &str) -> Logger {
        self.materialize(name);
        Logger::new(self.clone(), name)
    }

    pub fn root_logger(&self) -> Logger {
        self.get_logger("")
    }

    fn materialize(&self, name: &str) {
        if self.with_hierarchy(|h| h.contains(name)).unwrap_or(true) {
            return;
        }
        let _ = self.with_hierarchy_mut(|h| {
            h.node_mut(name);
        });
    }

    /// Names of all materialized loggers, root excluded
    pub fn logger_names(&self) -> Vec<String> {
        self.with_hierarchy(Hierarchy::logger_names)
            .unwrap_or_default()
    }

    /// Attach an appender to the named logger (root if empty)
    pub fn add_appender(&self, logger_name: &str, appender: Arc<dyn Appender>) -> Result<()> {
        self.with_hierarchy_mut(|h| h.node_mut(logger_name).appenders.push(appender))
    }

    /// Register `handler` as a callback appender on `logger_name`, or on root
    /// when the name is `None` or empty.
    ///
    /// Each call adds an independent appender instance.
    pub fn attach_callback(
        &self,
        logger_name: Option<&str>,
        handler: Option<LogEventHandler>,
    ) -> Result<()> {
        let handler = handler.ok_or(LoggerError::InvalidHandler)?;
        self.add_appender(
            logger_name.unwrap_or(""),
            Arc::new(CallbackAppender::new(handler)),
        )
    }

    /// Filter and dispatch one record. Never fails; on a non-live engine or
    /// below the effective level the call is a no-op.
    pub fn log(
        &self,
        logger_name: &str,
        level: LogLevel,
        message: impl Into<String>,
        location: Option<Location>,
    ) {
        let _scope = DispatchScope::enter(&self.inner);
        self.materialize(logger_name);

        let appenders = self.with_hierarchy(|h| {
            if level.passes(h.effective_level(logger_name)) {
                Some(h.collect_appenders(logger_name))
            } else {
                None
            }
        });

        let Some(Some(appenders)) = appenders else {
            self.inner.metrics.record_filtered();
            return;
        };

        let record_name = if Hierarchy::is_root(logger_name) {
            ROOT_LOGGER_NAME
        } else {
            logger_name
        };
        let mut entry = LogEntry::new(record_name, level, message);
        if let Some(location) = location {
            entry = entry.with_location(location);
        }

        self.dispatch(&appenders, &entry);
    }

    fn dispatch(&self, appenders: &[Arc<dyn Appender>], entry: &LogEntry) {
        self.inner.metrics.record_dispatched();
        for (idx, appender) in appenders.iter().enumerate() {
            if let Err(e) = appender.append(entry) {
                eprintln!(
                    "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                    idx,
                    appender.name(),
                    e
                );
                self.inner.metrics.record_appender_failure();
            }
        }
    }

    /// Log by wire level code. Fails only when `logger_name` is `None`;
    /// codes outside the defined set are dropped silently.
    pub fn log_str(&self, logger_name: Option<&str>, level: i32, message: &str) -> Result<()> {
        let name = logger_name
            .ok_or_else(|| LoggerError::invalid_argument("logger_name", "must not be null"))?;

        match LogLevel::from_code(level) {
            Some(level) => self.log(name, level, message, None),
            None => {
                self.inner.metrics.record_filtered();
            }
        }
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::LogEvent;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn live_engine() -> (Engine, EngineToken) {
        let engine = Engine::new();
        let token = engine.initialize().expect("initialize");
        (engine, token)
    }

    fn counting_handler(counter: &Arc<AtomicUsize>) -> Option<LogEventHandler> {
        let counter = Arc::clone(counter);
        Some(Arc::new(move |_event: &LogEvent<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn test_refcounted_lifecycle() {
        let engine = Engine::new();
        assert!(!engine.is_live());

        let first = engine.initialize().unwrap();
        let second = engine.initialize().unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.ref_count(), 2);

        engine.deinitialize(first).unwrap();
        assert!(engine.is_live());

        engine.deinitialize(second).unwrap();
        assert!(!engine.is_live());
        assert!(matches!(
            engine.deinitialize(second),
            Err(LoggerError::DoubleRelease)
        ));
    }

    #[test]
    fn test_unknown_token_rejected() {
        let (engine, token) = live_engine();
        let bogus = EngineToken::from_raw(token.as_raw() + 100);
        assert!(matches!(
            engine.deinitialize(bogus),
            Err(LoggerError::InvalidToken { .. })
        ));
        assert!(engine.is_live());
    }

    #[test]
    fn test_nested_initialize_keeps_state() {
        let (engine, first) = live_engine();
        engine.get_logger("kept").set_level(Some(LogLevel::Error)).unwrap();

        let second = engine.initialize().unwrap();
        assert_eq!(engine.get_logger("kept").level(), Some(LogLevel::Error));

        engine.deinitialize(second).unwrap();
        engine.deinitialize(first).unwrap();
    }

    #[test]
    fn test_shutdown_ignores_refcount() {
        let (engine, token) = live_engine();
        let _other = engine.initialize().unwrap();

        engine.shutdown();
        assert!(!engine.is_live());
        assert_eq!(engine.ref_count(), 0);
        assert!(matches!(
            engine.deinitialize(token),
            Err(LoggerError::DoubleRelease)
        ));

        // safe to repeat, and on a fresh engine
        engine.shutdown();
        Engine::new().shutdown();
    }

    #[test]
    fn test_reinitialize_after_teardown_starts_fresh() {
        let (engine, token) = live_engine();
        engine.get_logger("old").set_level(Some(LogLevel::Fatal)).unwrap();
        engine.deinitialize(token).unwrap();

        let _token = engine.initialize().unwrap();
        assert!(engine.logger_names().is_empty());
    }

    #[test]
    fn test_attach_null_handler() {
        let (engine, _token) = live_engine();
        assert!(matches!(
            engine.attach_callback(None, None),
            Err(LoggerError::InvalidHandler)
        ));
    }

    #[test]
    fn test_operations_on_dead_engine() {
        let engine = Engine::new();
        let counter = Arc::new(AtomicUsize::new(0));

        assert!(matches!(
            engine.attach_callback(None, counting_handler(&counter)),
            Err(LoggerError::NotInitialized)
        ));
        assert!(matches!(
            engine.configure_basic(),
            Err(LoggerError::NotInitialized)
        ));
        assert!(matches!(
            engine.configure_from_str("{}"),
            Err(LoggerError::NotInitialized)
        ));
        assert!(engine.log_str(Some("a"), 20000, "dropped").is_ok());
        assert!(engine.logger_names().is_empty());
    }

    #[test]
    fn test_log_str_null_name() {
        let (engine, _token) = live_engine();
        assert!(matches!(
            engine.log_str(None, 20000, "m"),
            Err(LoggerError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_unknown_level_code_is_dropped() {
        let (engine, _token) = live_engine();
        let counter = Arc::new(AtomicUsize::new(0));
        engine.attach_callback(None, counting_handler(&counter)).unwrap();

        engine.log_str(Some("a"), 12345, "m").unwrap();
        engine.log_str(Some("a"), -1, "m").unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(engine.metrics().filtered_count(), 2);
    }

    #[test]
    fn test_log_str_materializes_logger() {
        let (engine, _token) = live_engine();
        engine.log_str(Some("svc.worker"), 20000, "m").unwrap();
        assert_eq!(engine.logger_names(), vec!["svc.worker".to_string()]);
    }

    #[test]
    fn test_root_records_named_root() {
        let (engine, _token) = live_engine();
        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);
        engine
            .attach_callback(
                Some(""),
                Some(Arc::new(move |event: &LogEvent<'_>| {
                    sink.lock().push(event.logger_name.to_string());
                })),
            )
            .unwrap();

        engine.log("", LogLevel::Info, "m", None);
        assert_eq!(*names.lock(), vec![ROOT_LOGGER_NAME.to_string()]);
    }

    #[test]
    fn test_handler_may_log_reentrantly() {
        let (engine, _token) = live_engine();
        let counter = Arc::new(AtomicUsize::new(0));
        let inner_engine = engine.clone();
        let inner_counter = Arc::clone(&counter);

        engine
            .attach_callback(
                Some("outer"),
                Some(Arc::new(move |_event: &LogEvent<'_>| {
                    inner_counter.fetch_add(1, Ordering::SeqCst);
                    inner_engine.log("inner", LogLevel::Info, "from handler", None);
                })),
            )
            .unwrap();

        engine.log("outer", LogLevel::Info, "m", None);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(engine.logger_names().contains(&"inner".to_string()));
    }

    #[test]
    fn test_handler_may_shut_down_its_engine() {
        let (engine, _token) = live_engine();
        let inner_engine = engine.clone();
        engine
            .attach_callback(
                Some("closer"),
                Some(Arc::new(move |_event: &LogEvent<'_>| {
                    inner_engine.shutdown();
                    inner_engine.log("after", LogLevel::Info, "ignored", None);
                })),
            )
            .unwrap();

        engine.log("closer", LogLevel::Info, "m", None);
        assert!(!engine.is_live());
        assert!(engine.logger_names().is_empty());
    }

    #[test]
    fn test_dispatch_scope_tracks_nesting() {
        let engine = Engine::new();
        assert!(!DispatchScope::is_active(&engine.inner));
        {
            let _outer = DispatchScope::enter(&engine.inner);
            {
                let _inner = DispatchScope::enter(&engine.inner);
                assert!(DispatchScope::is_active(&engine.inner));
            }
            assert!(DispatchScope::is_active(&engine.inner));
            assert!(!DispatchScope::is_active(&Engine::new().inner));
        }
        assert!(!DispatchScope::is_active(&engine.inner));
    }

    #[test]
    fn test_failing_appender_is_counted() {
        struct Failing;

        impl Appender for Failing {
            fn append(&self, _entry: &LogEntry) -> Result<()> {
                Err(LoggerError::IoError(std::io::Error::other("Simulated failure")))
            }

            fn flush(&self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        let (engine, _token) = live_engine();
        engine.add_appender("", Arc::new(Failing)).unwrap();
        for _ in 0..3 {
            engine.log("a", LogLevel::Info, "m", None);
        }
        assert_eq!(engine.metrics().appender_failures(), 3);
        assert_eq!(engine.metrics().dispatched_count(), 3);
    }
}
