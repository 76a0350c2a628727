//! Log records and the caller context attached to them

use chrono::{DateTime, Local};

use crate::level::LogLevel;

/// The call site that issued a log emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Source file as recorded by the compiler (same form as `file!()`)
    pub file: String,
    /// Name of the calling function, without its module path
    pub function: String,
    /// Line of the call
    pub line: u32,
}

impl CallerContext {
    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }
}

/// A single log emission
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    /// Always set for records produced by a `Logger`
    pub caller: Option<CallerContext>,
}

impl LogRecord {
    /// Create a record stamped with the current local time
    pub fn new(level: LogLevel, message: impl Into<String>, caller: Option<CallerContext>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            caller,
        }
    }
}
