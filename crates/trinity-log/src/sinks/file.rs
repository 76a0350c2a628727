//! Append-only file sink
//!
//! Useful when stderr isn't visible (agent hosts, tool subprocesses), and as
//! a durable record of a session.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::traits::Sink;
use crate::error::{LogError, LogResult};
use crate::format::{Formatter, PlainFormatter};
use crate::level::LogLevel;
use crate::record::LogRecord;

/// A sink that appends plain lines to a file
///
/// The file is opened once in append mode and never truncated. Every line is
/// written unbuffered while holding the sink's lock.
pub struct FileSink {
    path: PathBuf,
    name: String,
    file: Mutex<Option<File>>,
    formatter: Box<dyn Formatter>,
    min_level: LogLevel,
}

impl FileSink {
    /// Open `path` for appending with the plain formatter, creating the
    /// parent directory if needed
    pub fn open(path: impl AsRef<Path>) -> LogResult<Self> {
        Self::with_formatter(path, Box::new(PlainFormatter::default()))
    }

    pub fn with_formatter(path: impl AsRef<Path>, formatter: Box<dyn Formatter>) -> LogResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LogError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::OpenFile {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            name: format!("file:{}", path.display()),
            path,
            file: Mutex::new(Some(file)),
            formatter,
            min_level: LogLevel::Debug,
        })
    }

    /// Only accept records at or above `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.file.lock().is_none()
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn emit(&self, record: &LogRecord) -> LogResult<()> {
        let mut line = self.formatter.format(record);
        line.push('\n');

        let mut guard = self.file.lock();
        let file = guard
            .as_mut()
            .ok_or_else(|| LogError::SinkClosed(self.name.clone()))?;
        file.write_all(line.as_bytes())
            .map_err(|err| LogError::write(&self.name, err))
    }

    fn flush(&self) -> LogResult<()> {
        match self.file.lock().as_mut() {
            Some(file) => file.flush().map_err(|err| LogError::write(&self.name, err)),
            None => Ok(()),
        }
    }

    fn close(&self) -> LogResult<()> {
        match self.file.lock().take() {
            Some(mut file) => file.flush().map_err(|err| LogError::write(&self.name, err)),
            None => Ok(()),
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("min_level", &self.min_level)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CallerContext;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(
            LogLevel::Info,
            message,
            Some(CallerContext::new("src/demo.rs", "run", 1)),
        )
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log").join("nested").join("app.log");

        let sink = FileSink::open(&path).unwrap();
        sink.emit(&record("hello")).unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with(" - INFO - [src/demo.rs:run:1] - hello\n"));
        assert!(!content.contains('\x1b'));
    }

    #[test]
    fn test_appends_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        FileSink::open(&path).unwrap().emit(&record("first")).unwrap();
        FileSink::open(&path).unwrap().emit(&record("second")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempdir().unwrap();
        let sink = FileSink::open(dir.path().join("app.log")).unwrap();

        sink.close().unwrap();
        sink.close().unwrap();
        assert!(sink.is_closed());
        assert!(matches!(sink.emit(&record("late")), Err(LogError::SinkClosed(_))));
    }

    #[test]
    fn test_open_failure_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let err = FileSink::open(blocker.join("app.log")).unwrap_err();
        assert!(err.is_file_error());
    }

    #[test]
    fn test_concurrent_lines_do_not_interleave() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = Arc::new(FileSink::open(&path).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..200 {
                        sink.emit(&record(&format!("thread-{t}-msg-{i}-{}", "x".repeat(64)))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 8 * 200);
        for line in lines {
            assert_eq!(line.matches("thread-").count(), 1, "interleaved line: {line}");
            assert!(line.ends_with(&"x".repeat(64)));
        }
    }
}
