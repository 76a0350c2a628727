//! In-memory sink

use parking_lot::Mutex;

use super::traits::Sink;
use crate::error::LogResult;
use crate::format::{Formatter, PlainFormatter};
use crate::level::LogLevel;
use crate::record::LogRecord;

/// In-memory sink for testing and for hosts that render logs themselves
///
/// Keeps every accepted record together with its formatted line.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use trinity_log::{Logger, MemorySink};
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = Logger::from_sinks("", Vec::new());
/// logger.add_sink(sink.clone());
/// logger.info("ready");
/// assert!(sink.lines()[0].ends_with("ready"));
/// ```
pub struct MemorySink {
    entries: Mutex<Vec<(LogRecord, String)>>,
    formatter: Box<dyn Formatter>,
    min_level: LogLevel,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    /// Create an empty sink using the plain formatter
    pub fn new() -> Self {
        Self::with_formatter(Box::new(PlainFormatter::default()))
    }

    pub fn with_formatter(formatter: Box<dyn Formatter>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            formatter,
            min_level: LogLevel::Debug,
        }
    }

    /// Only accept records at or above `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Formatted lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.entries.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    /// Accepted records, oldest first
    pub fn records(&self) -> Vec<LogRecord> {
        self.entries.lock().iter().map(|(record, _)| record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn emit(&self, record: &LogRecord) -> LogResult<()> {
        let line = self.formatter.format(record);
        self.entries.lock().push((record.clone(), line));
        Ok(())
    }

    fn flush(&self) -> LogResult<()> {
        Ok(())
    }

    fn close(&self) -> LogResult<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MemorySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySink")
            .field("len", &self.len())
            .field("min_level", &self.min_level)
            .finish()
    }
}
