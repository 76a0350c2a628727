//! Trinity Log
//!
//! Caller-aware logging for Trinity agents, their model bindings and tool
//! subprocesses. Every line records where it came from:
//!
//! ```text
//! 2024-03-09 14:05:07 - INFO - [src/excel.rs:write_cell:42] - sheet updated
//! ```
//!
//! ## Pieces
//!
//! - [`Logger`]: one channel with a colored console sink and an optional
//!   plain, append-only file sink
//! - [`LoggerManager`]: at most one logger per log file path, created lazily
//! - [`LoggerManager::assert_cond`]: log an invariant violation with a stack
//!   trace, then exit the process or hand the failure back
//! - [`facade`]: a process-wide default logger behind `logi`/`logw`/... free
//!   functions, initialized explicitly at start-up
//!
//! ```rust,no_run
//! use trinity_log::{facade, logi, log_assert, LogConfig, OnFailure};
//!
//! facade::init(LogConfig::from_env()?)?;
//! logi("excel agent ready");
//!
//! let rows = 0;
//! log_assert(rows > 0, "sheet has no rows", None, OnFailure::Terminate).ok();
//! # Ok::<(), trinity_log::LogError>(())
//! ```

pub mod callsite;
pub mod config;
pub mod error;
pub mod facade;
pub mod format;
pub mod level;
pub mod sinks;

mod assertion;
mod logger;
mod manager;
mod record;
mod report;

pub use assertion::{AssertionError, OnFailure, ASSERTION_EXIT_CODE};
pub use callsite::{StackFrame, StackTrace, CALLER_FRAME_OFFSET};
pub use config::{default_log_path, project_root, LogConfig};
pub use error::{LogError, LogResult};
pub use facade::{log_assert, logd, loge, logf, logf_error, logi, logw};
pub use format::{ColorFormatter, Formatter, PlainFormatter, DEFAULT_DATE_FORMAT};
pub use level::LogLevel;
pub use logger::Logger;
pub use manager::LoggerManager;
pub use record::{CallerContext, LogRecord};
pub use report::ErrorReport;
pub use sinks::{ConsoleSink, ConsoleTarget, FileSink, MemorySink, SharedSink, Sink};
