//! Logging error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or writing logs
#[derive(Error, Debug)]
pub enum LogError {
    /// The parent directory of a log file could not be created
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The log file could not be opened for appending
    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A sink failed to accept a line
    #[error("write to sink '{sink}' failed: {source}")]
    Write {
        sink: String,
        #[source]
        source: io::Error,
    },

    /// The sink was closed before the write
    #[error("sink '{0}' is closed")]
    SinkClosed(String),

    /// Unknown level name in configuration
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// Configuration file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// `facade::init` was called more than once
    #[error("logging facade already initialized")]
    AlreadyInitialized,
}

impl LogError {
    /// Create a write error for the named sink
    pub fn write(sink: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            sink: sink.into(),
            source,
        }
    }

    /// Whether this error came from a file sink or file setup
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::CreateDir { .. } | Self::OpenFile { .. })
    }
}

pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LogError::write("console", io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "write to sink 'console' failed: pipe closed");

        let err = LogError::SinkClosed("file".to_string());
        assert_eq!(err.to_string(), "sink 'file' is closed");
    }

    #[test]
    fn test_is_file_error() {
        let err = LogError::OpenFile {
            path: PathBuf::from("/nope/app.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_file_error());
        assert!(!LogError::AlreadyInitialized.is_file_error());
    }
}
