//! Registry of loggers keyed by log file path

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::LogConfig;
use crate::error::LogResult;
use crate::logger::{console_sink, Logger};

/// Keeps at most one [`Logger`] per path ("" is the console-only logger)
///
/// Loggers are created on first request and stay registered until
/// [`LoggerManager::reset`] or [`LoggerManager::shutdown`]. The lock is held
/// while a logger is built, so concurrent first requests for a path still
/// produce a single logger and a single set of sinks.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use trinity_log::LoggerManager;
///
/// let manager = LoggerManager::new();
/// let a = manager.console();
/// let b = manager.get_logger("").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct LoggerManager {
    config: LogConfig,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LoggerManager {
    /// Create an empty registry with the default configuration
    pub fn new() -> Self {
        Self::with_config(LogConfig::default())
    }

    /// Create an empty registry whose loggers use `config`
    pub fn with_config(config: LogConfig) -> Self {
        Self {
            config,
            loggers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Get the logger for `path`, creating it on first use
    ///
    /// A failure to create the log file is returned and nothing is
    /// registered, so a later call retries.
    pub fn get_logger(&self, path: &str) -> LogResult<Arc<Logger>> {
        let mut loggers = self.loggers.lock();
        if let Some(logger) = loggers.get(path) {
            return Ok(Arc::clone(logger));
        }

        let logger = Arc::new(Logger::with_config(path, &self.config)?);
        loggers.insert(path.to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    /// The console-only logger
    pub fn console(&self) -> Arc<Logger> {
        let mut loggers = self.loggers.lock();
        let logger = loggers
            .entry(String::new())
            .or_insert_with(|| Arc::new(Logger::from_sinks("", vec![console_sink(&self.config)])));
        Arc::clone(logger)
    }

    /// Register a pre-built logger under `path` unless one already exists,
    /// and return whichever logger is registered
    ///
    /// If the path is taken, `logger` is dropped and its sinks are closed.
    pub fn install(&self, path: &str, logger: Logger) -> Arc<Logger> {
        let mut loggers = self.loggers.lock();
        let registered = loggers
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(logger));
        Arc::clone(registered)
    }

    /// Check if a logger is registered for `path`
    pub fn contains(&self, path: &str) -> bool {
        self.loggers.lock().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.loggers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.loggers.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Flush every registered logger
    pub fn flush_all(&self) {
        for logger in self.snapshot() {
            let _ = logger.flush();
        }
    }

    /// Unregister every logger. Loggers still held elsewhere keep working
    /// and close when their last handle is dropped.
    pub fn reset(&self) {
        self.loggers.lock().clear();
    }

    /// Unregister and close every logger
    pub fn shutdown(&self) {
        let loggers: Vec<_> = self.loggers.lock().drain().map(|(_, logger)| logger).collect();
        for logger in loggers {
            let _ = logger.close();
        }
    }

    fn snapshot(&self) -> Vec<Arc<Logger>> {
        self.loggers.lock().values().cloned().collect()
    }
}

impl Default for LoggerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerManager")
            .field("config", &self.config)
            .field("paths", &self.paths())
            .finish()
    }
}
