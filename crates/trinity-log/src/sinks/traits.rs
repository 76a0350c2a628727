//! Sink trait definition

use std::sync::Arc;

use crate::error::LogResult;
use crate::level::LogLevel;
use crate::record::LogRecord;

/// A destination that accepts formatted log lines
///
/// Implementations:
/// - `ConsoleSink`: colored lines on stderr/stdout
/// - `FileSink`: plain lines appended to a file
/// - `MemorySink`: keeps lines in memory for tests and embedding hosts
///
/// Each implementation serializes its own writes, so a line is never
/// interleaved with another one written concurrently.
pub trait Sink: Send + Sync {
    /// Name used in error messages
    fn name(&self) -> &str;

    /// Lowest level this sink accepts
    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }

    /// Format and write one record
    fn emit(&self, record: &LogRecord) -> LogResult<()>;

    /// Flush buffered output
    fn flush(&self) -> LogResult<()>;

    /// Flush and release the underlying resource. Safe to call repeatedly.
    fn close(&self) -> LogResult<()>;

    /// Whether this sink should receive a record at `level`
    fn accepts(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }
}

/// Type alias for a shared sink
pub type SharedSink = Arc<dyn Sink>;
