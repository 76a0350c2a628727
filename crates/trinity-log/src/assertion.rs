//! Fail-fast assertions that log full context before giving up
//!
//! A failed assertion logs an ERROR record with the message and a second
//! ERROR record with the error report or the current stack trace, on the
//! manager's console-only logger. Then, depending on [`OnFailure`], the
//! process exits with [`ASSERTION_EXIT_CODE`] or an [`AssertionError`] is
//! returned to the caller.

use std::process;

use thiserror::Error;

use crate::callsite::CallSite;
use crate::level::LogLevel;
use crate::logger::Trailer;
use crate::manager::LoggerManager;
use crate::report::ErrorReport;

/// Exit status of a process terminated by a failed assertion
pub const ASSERTION_EXIT_CODE: i32 = 255;

/// What a failed assertion does after logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnFailure {
    /// Flush every logger of the manager and exit the process
    #[default]
    Terminate,
    /// Return an [`AssertionError`] so the caller can recover
    Propagate,
}

/// A failed assertion handed back to the caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("assertion failed at {location}: {message}")]
pub struct AssertionError {
    message: String,
    location: String,
    cause: Option<String>,
}

impl AssertionError {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `file:line` of the assertion
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Rendered error report, if one was attached
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

impl LoggerManager {
    /// Check `cond`; on failure log `message` with `error` (or the stack
    /// trace) and apply `on_failure`
    ///
    /// # Example
    ///
    /// ```
    /// use trinity_log::{LoggerManager, OnFailure};
    ///
    /// let manager = LoggerManager::new();
    /// let rows = 0;
    /// let checked = manager.assert_cond(rows > 0, "sheet has no rows", None, OnFailure::Propagate);
    /// assert!(checked.is_err());
    /// ```
    #[track_caller]
    #[inline(never)]
    pub fn assert_cond(
        &self,
        cond: bool,
        message: &str,
        error: Option<ErrorReport>,
        on_failure: OnFailure,
    ) -> Result<(), AssertionError> {
        if cond {
            return Ok(());
        }
        self.fail_assertion(message, error.as_ref(), on_failure, CallSite::here().nested(1))
    }

    /// Check `cond` and terminate the process when it doesn't hold
    #[track_caller]
    #[inline(never)]
    pub fn require(&self, cond: bool, message: &str) {
        if !cond {
            let _ = self.fail_assertion(message, None, OnFailure::Terminate, CallSite::here().nested(1));
        }
    }

    /// Log a failed assertion and apply the failure policy
    ///
    /// Sits between `Logger::dispatch` and the public entry point, hence the
    /// `nested(1)` call sites above.
    #[inline(never)]
    pub(crate) fn fail_assertion(
        &self,
        message: &str,
        error: Option<&ErrorReport>,
        on_failure: OnFailure,
        site: CallSite,
    ) -> Result<(), AssertionError> {
        let logger = self.console();
        let trailer = match error {
            Some(report) => Trailer::Error(report),
            None => Trailer::StackTrace,
        };
        let result = logger.dispatch(LogLevel::Error, message, site, trailer);
        logger.report_failure(result);

        match on_failure {
            OnFailure::Terminate => {
                self.flush_all();
                process::exit(ASSERTION_EXIT_CODE)
            }
            OnFailure::Propagate => Err(AssertionError {
                message: message.to_string(),
                location: format!("{}:{}", site.location().file(), site.location().line()),
                cause: error.map(ToString::to_string),
            }),
        }
    }
}
