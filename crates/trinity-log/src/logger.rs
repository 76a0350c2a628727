//! The `Logger`: one logging channel with its sinks
//!
//! A logger always writes colored lines to the console and, when built
//! with a file path, plain lines to that file. Every record carries the
//! file, function and line of the code that called the logging method.

use std::error::Error;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::callsite::{self, CallSite};
use crate::config::LogConfig;
use crate::error::LogResult;
use crate::format::{ColorFormatter, Formatter, PlainFormatter};
use crate::level::LogLevel;
use crate::record::LogRecord;
use crate::report::ErrorReport;
use crate::sinks::{ConsoleSink, FileSink, SharedSink, Sink};

/// What follows the primary record of an emission
#[derive(Debug, Clone, Copy)]
pub(crate) enum Trailer<'a> {
    None,
    /// A second record listing the stack from the call site outward
    StackTrace,
    /// A second record with the error report and the stack
    Error(&'a ErrorReport),
}

/// A logging channel identified by its file path ("" for console-only)
///
/// The channel itself accepts every level; thresholds live on the sinks.
///
/// # Example
///
/// ```no_run
/// use trinity_log::Logger;
///
/// let logger = Logger::new("log/app.log")?;
/// logger.info("agent ready");
/// logger.warning("tool server slow to start");
/// # Ok::<(), trinity_log::LogError>(())
/// ```
pub struct Logger {
    path: String,
    sinks: RwLock<Vec<SharedSink>>,
    failure_reported: AtomicBool,
}

impl Logger {
    /// Create a logger with the default configuration
    pub fn new(path: impl Into<String>) -> LogResult<Self> {
        Self::with_config(path, &LogConfig::default())
    }

    /// Create a logger writing to the console and, if `path` is not empty,
    /// appending to `path`
    pub fn with_config(path: impl Into<String>, config: &LogConfig) -> LogResult<Self> {
        let logger = Self::from_sinks(path, Vec::new());
        logger.reinitialize(config)?;
        Ok(logger)
    }

    /// Create a console-only logger with the default configuration
    pub fn console() -> Self {
        Self::from_sinks("", vec![console_sink(&LogConfig::default())])
    }

    /// Create a logger over an explicit set of sinks
    pub fn from_sinks(path: impl Into<String>, sinks: Vec<SharedSink>) -> Self {
        Self {
            path: path.into(),
            sinks: RwLock::new(sinks),
            failure_reported: AtomicBool::new(false),
        }
    }

    /// Replace the current sinks with a fresh console sink and, for a
    /// non-empty path, a fresh file sink. The old sinks are closed.
    ///
    /// On error the current sinks are left untouched.
    pub fn reinitialize(&self, config: &LogConfig) -> LogResult<()> {
        let mut fresh = vec![console_sink(config)];
        if let Some(path) = self.file_path() {
            let formatter = Box::new(PlainFormatter::new(config.date_format.clone()));
            let file = FileSink::with_formatter(path, formatter)?.with_min_level(config.file_level);
            fresh.push(Arc::new(file));
        }

        let previous = std::mem::replace(&mut *self.sinks.write(), fresh);
        for sink in previous {
            let _ = sink.close();
        }
        self.failure_reported.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// The path this logger was registered under ("" for console-only)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The log file, if this logger has one
    pub fn file_path(&self) -> Option<&Path> {
        (!self.path.is_empty()).then(|| Path::new(&self.path))
    }

    /// Attach another sink
    pub fn add_sink<S: Sink + 'static>(&self, sink: Arc<S>) {
        self.sinks.write().push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Whether any sink would accept a record at `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.sinks.read().iter().any(|sink| sink.accepts(level))
    }

    /// Log a debug message
    #[track_caller]
    #[inline(never)]
    pub fn debug(&self, message: &str) {
        let result = self.dispatch(LogLevel::Debug, message, CallSite::here(), Trailer::None);
        self.report_failure(result);
    }

    /// Log an info message
    #[track_caller]
    #[inline(never)]
    pub fn info(&self, message: &str) {
        let result = self.dispatch(LogLevel::Info, message, CallSite::here(), Trailer::None);
        self.report_failure(result);
    }

    /// Log a warning message
    #[track_caller]
    #[inline(never)]
    pub fn warning(&self, message: &str) {
        let result = self.dispatch(LogLevel::Warning, message, CallSite::here(), Trailer::None);
        self.report_failure(result);
    }

    /// Log an error message
    #[track_caller]
    #[inline(never)]
    pub fn error(&self, message: &str) {
        let result = self.dispatch(LogLevel::Error, message, CallSite::here(), Trailer::None);
        self.report_failure(result);
    }

    /// Log a critical message followed by a second record holding the
    /// current stack trace (call site outward, runtime frames omitted)
    #[track_caller]
    #[inline(never)]
    pub fn critical(&self, message: &str) {
        let result = self.dispatch(LogLevel::Critical, message, CallSite::here(), Trailer::StackTrace);
        self.report_failure(result);
    }

    /// Log an error value at critical level, followed by a second record
    /// with its type, cause chain and the current stack trace
    #[track_caller]
    #[inline(never)]
    pub fn critical_error<E: Error + ?Sized>(&self, error: &E) {
        let report = ErrorReport::new(error);
        let result = self.dispatch(
            LogLevel::Critical,
            report.message(),
            CallSite::here(),
            Trailer::Error(&report),
        );
        self.report_failure(result);
    }

    /// Log a message at `level`
    #[track_caller]
    #[inline(never)]
    pub fn log(&self, level: LogLevel, message: &str) {
        let result = self.dispatch(level, message, CallSite::here(), Trailer::None);
        self.report_failure(result);
    }

    /// Log a message at `level`, returning the first sink failure
    #[track_caller]
    #[inline(never)]
    pub fn try_log(&self, level: LogLevel, message: &str) -> LogResult<()> {
        self.dispatch(level, message, CallSite::here(), Trailer::None)
    }

    /// Flush every sink
    pub fn flush(&self) -> LogResult<()> {
        let sinks = self.sinks.read();
        let mut result = Ok(());
        for sink in sinks.iter() {
            let flushed = sink.flush();
            result = result.and(flushed);
        }
        result
    }

    /// Close and detach every sink. Safe to call repeatedly; later
    /// emissions are dropped.
    pub fn close(&self) -> LogResult<()> {
        let sinks = std::mem::take(&mut *self.sinks.write());
        let mut result = Ok(());
        for sink in sinks {
            let closed = sink.close();
            result = result.and(closed);
        }
        result
    }

    /// Resolve the call site, then write the record (and its trailer) to
    /// every sink that accepts the level.
    ///
    /// Must be called directly from the public entry point; see
    /// [`callsite::CALLER_FRAME_OFFSET`].
    #[inline(never)]
    pub(crate) fn dispatch(
        &self,
        level: LogLevel,
        message: &str,
        site: CallSite,
        trailer: Trailer<'_>,
    ) -> LogResult<()> {
        if !self.enabled(level) {
            return Ok(());
        }

        let walked = callsite::walk(site, !matches!(trailer, Trailer::None));
        let mut result = self.write(&LogRecord::new(level, message, Some(walked.caller.clone())));

        let trace = walked.trace.to_string();
        let extra = match trailer {
            Trailer::None => None,
            Trailer::StackTrace if walked.trace.is_empty() => None,
            Trailer::StackTrace => Some(format!("Stack trace:\n{}", trace.trim_end())),
            Trailer::Error(report) => Some(format!(
                "Error trace:\n{}\nStack trace:\n{}",
                report,
                trace.trim_end()
            )),
        };
        if let Some(extra) = extra {
            let written = self.write(&LogRecord::new(level, extra, Some(walked.caller)));
            result = result.and(written);
        }
        result
    }

    fn write(&self, record: &LogRecord) -> LogResult<()> {
        let sinks = self.sinks.read();
        let mut first_error = None;
        for sink in sinks.iter().filter(|sink| sink.accepts(record.level)) {
            if let Err(err) = sink.emit(record) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Routine emissions never fail; the first sink failure is reported on
    /// stderr since the failing sink can't carry it.
    pub(crate) fn report_failure(&self, result: LogResult<()>) {
        if let Err(err) = result {
            if !self.failure_reported.swap(true, Ordering::Relaxed) {
                eprintln!("[trinity-log] {} (logger '{}')", err, self.path);
            }
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("sinks", &self.sink_count())
            .finish()
    }
}

pub(crate) fn console_sink(config: &LogConfig) -> SharedSink {
    let formatter: Box<dyn Formatter> = if config.color {
        Box::new(ColorFormatter::new(config.date_format.clone()))
    } else {
        Box::new(PlainFormatter::new(config.date_format.clone()))
    };
    Arc::new(ConsoleSink::with_formatter(config.console, formatter).with_min_level(config.console_level))
}

/// Formatting macros; the reported caller is the macro invocation site
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warning(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_critical {
    ($logger:expr, $($arg:tt)*) => {
        $logger.critical(&format!($($arg)*))
    };
}
