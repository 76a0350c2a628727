//! Severity levels and their console colors

use std::fmt;
use std::str::FromStr;

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Log levels, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 10,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl LogLevel {
    /// Every level, most verbose first
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// Record name as it appears in a log line
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Foreground color used by the colorized formatter
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Debug => Color::Cyan,
            LogLevel::Info => Color::Green,
            LogLevel::Warning => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Critical => Color::Magenta,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" | "fatal" => Ok(LogLevel::Critical),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels_ordered() {
        assert!(LogLevel::Info > LogLevel::Debug);
        assert!(LogLevel::Warning > LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warning);
        assert!(LogLevel::Critical > LogLevel::Error);
    }

    #[test]
    fn test_colors() {
        assert_eq!(LogLevel::Debug.color(), Color::Cyan);
        assert_eq!(LogLevel::Info.color(), Color::Green);
        assert_eq!(LogLevel::Warning.color(), Color::Yellow);
        assert_eq!(LogLevel::Error.color(), Color::Red);
        assert_eq!(LogLevel::Critical.color(), Color::Magenta);
    }

    #[test]
    fn test_parse() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(" info ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("fatal".parse::<LogLevel>().unwrap(), LogLevel::Critical);
        assert!(matches!(
            "verbose".parse::<LogLevel>(),
            Err(LogError::InvalidLevel(name)) if name == "verbose"
        ));
    }

    #[test]
    fn test_display_matches_record_name() {
        for level in LogLevel::ALL {
            assert_eq!(level.to_string(), level.as_str());
        }
    }
}
