//! Process-wide default logger and level-named free functions
//!
//! Call [`init`] (or [`init_default`]) once at start-up; afterwards any part
//! of the process can use [`logi`], [`logw`], [`log_assert`] and friends
//! without building its own logger. Until then the functions write to a
//! console-only fallback and no file is touched.
//!
//! ```no_run
//! use trinity_log::{facade, logi, LogConfig};
//!
//! facade::init(LogConfig::default().with_log_path("log/app.log"))?;
//! logi("history agent ready");
//! trinity_log::logw!("{} tools failed to start", 1);
//! facade::shutdown();
//! # Ok::<(), trinity_log::LogError>(())
//! ```

use std::error::Error;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

use crate::assertion::{AssertionError, OnFailure};
use crate::callsite::CallSite;
use crate::config::LogConfig;
use crate::error::{LogError, LogResult};
use crate::level::LogLevel;
use crate::logger::{Logger, Trailer};
use crate::manager::LoggerManager;
use crate::report::ErrorReport;

/// The registry and default logger behind the free functions
pub struct Facade {
    manager: LoggerManager,
    default: Arc<Logger>,
}

impl Facade {
    /// Build a registry from `config` and open its default logger at
    /// `config.log_path()`
    pub fn new(config: LogConfig) -> LogResult<Self> {
        let path = config.log_path().to_string_lossy().into_owned();
        let manager = LoggerManager::with_config(config);
        let default = manager.get_logger(&path)?;
        Ok(Self { manager, default })
    }

    fn console_only() -> Self {
        let manager = LoggerManager::new();
        let default = manager.console();
        Self { manager, default }
    }

    pub fn manager(&self) -> &LoggerManager {
        &self.manager
    }

    /// The default logger
    pub fn logger(&self) -> &Arc<Logger> {
        &self.default
    }
}

impl std::fmt::Debug for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facade")
            .field("default", &self.default.path())
            .field("manager", &self.manager)
            .finish()
    }
}

static FACADE: OnceCell<Facade> = OnceCell::new();
static FALLBACK: Lazy<Facade> = Lazy::new(Facade::console_only);

/// Initialize the process-wide facade. Fails if it is already initialized.
pub fn init(config: LogConfig) -> LogResult<&'static Facade> {
    let facade = Facade::new(config)?;
    FACADE
        .try_insert(facade)
        .map_err(|_| LogError::AlreadyInitialized)
}

/// Initialize the facade from `TRINITY_LOG_*` variables and the project's
/// config file
pub fn init_default() -> LogResult<&'static Facade> {
    init(LogConfig::from_env()?)
}

pub fn is_initialized() -> bool {
    FACADE.get().is_some()
}

/// The initialized facade, or the console-only fallback
pub fn get() -> &'static Facade {
    FACADE.get().unwrap_or_else(|| &*FALLBACK)
}

/// The facade's registry
pub fn manager() -> &'static LoggerManager {
    &get().manager
}

/// The facade's default logger
pub fn logger() -> Arc<Logger> {
    Arc::clone(&get().default)
}

/// Flush and close every logger of the facade. Meant for process exit.
pub fn shutdown() {
    get().manager.shutdown();
    let _ = get().default.close();
}

// The free functions call `Logger::dispatch` themselves so that the caller
// frame sits at the same depth as for the `Logger` methods.

/// Log a debug message on the default logger
#[track_caller]
#[inline(never)]
pub fn logd(message: &str) {
    let logger = &get().default;
    let result = logger.dispatch(LogLevel::Debug, message, CallSite::here(), Trailer::None);
    logger.report_failure(result);
}

/// Log an info message on the default logger
#[track_caller]
#[inline(never)]
pub fn logi(message: &str) {
    let logger = &get().default;
    let result = logger.dispatch(LogLevel::Info, message, CallSite::here(), Trailer::None);
    logger.report_failure(result);
}

/// Log a warning on the default logger
#[track_caller]
#[inline(never)]
pub fn logw(message: &str) {
    let logger = &get().default;
    let result = logger.dispatch(LogLevel::Warning, message, CallSite::here(), Trailer::None);
    logger.report_failure(result);
}

/// Log an error on the default logger
#[track_caller]
#[inline(never)]
pub fn loge(message: &str) {
    let logger = &get().default;
    let result = logger.dispatch(LogLevel::Error, message, CallSite::here(), Trailer::None);
    logger.report_failure(result);
}

/// Log a critical message and the stack trace on the default logger
#[track_caller]
#[inline(never)]
pub fn logf(message: &str) {
    let logger = &get().default;
    let result = logger.dispatch(LogLevel::Critical, message, CallSite::here(), Trailer::StackTrace);
    logger.report_failure(result);
}

/// Log an error value, its causes and the stack trace at critical level on
/// the default logger
#[track_caller]
#[inline(never)]
pub fn logf_error<E: Error + ?Sized>(error: &E) {
    let logger = &get().default;
    let report = ErrorReport::new(error);
    let result = logger.dispatch(
        LogLevel::Critical,
        report.message(),
        CallSite::here(),
        Trailer::Error(&report),
    );
    logger.report_failure(result);
}

/// [`LoggerManager::assert_cond`] on the facade's registry
#[track_caller]
#[inline(never)]
pub fn log_assert(
    cond: bool,
    message: &str,
    error: Option<ErrorReport>,
    on_failure: OnFailure,
) -> Result<(), AssertionError> {
    if cond {
        return Ok(());
    }
    get()
        .manager
        .fail_assertion(message, error.as_ref(), on_failure, CallSite::here().nested(1))
}

#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::facade::logd(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! logi {
    ($($arg:tt)*) => {
        $crate::facade::logi(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::facade::logw(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::facade::loge(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::facade::logf(&format!($($arg)*))
    };
}
