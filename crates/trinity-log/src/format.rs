//! Rendering records into log lines
//!
//! Both formatters produce
//! `<timestamp> - <LEVEL> - [<file>:<function>:<line>] - <message>`.

use std::fmt::Display;

use colored::Colorize;

use crate::level::LogLevel;
use crate::record::LogRecord;

/// Default `strftime` pattern for the timestamp column
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a record into a single line (without trailing newline)
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

/// Formatter without color codes, used for files
#[derive(Debug, Clone)]
pub struct PlainFormatter {
    date_format: String,
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl PlainFormatter {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }
}

impl Formatter for PlainFormatter {
    fn format(&self, record: &LogRecord) -> String {
        render(record, &self.date_format, |_, value| value.to_string())
    }
}

/// Formatter that wraps the level, caller fields and message in the
/// level's ANSI color
///
/// The timestamp and the separators stay uncolored. The record is only
/// read, so several sinks can format the same record independently.
///
/// Building one turns on `colored`'s override. `colored` checks whether
/// stdout is a terminal, while console lines go to the configured stream
/// and are gated by `LogConfig::color`.
#[derive(Debug, Clone)]
pub struct ColorFormatter {
    date_format: String,
}

impl Default for ColorFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl ColorFormatter {
    pub fn new(date_format: impl Into<String>) -> Self {
        colored::control::set_override(true);
        Self {
            date_format: date_format.into(),
        }
    }
}

impl Formatter for ColorFormatter {
    fn format(&self, record: &LogRecord) -> String {
        render(record, &self.date_format, |level, value| {
            value.to_string().as_str().color(level.color()).to_string()
        })
    }
}

fn render<F>(record: &LogRecord, date_format: &str, paint: F) -> String
where
    F: Fn(LogLevel, &dyn Display) -> String,
{
    let level = record.level;
    let timestamp = record.timestamp.format(date_format);
    let message = paint(level, &record.message);

    match &record.caller {
        Some(caller) => format!(
            "{} - {} - [{}:{}:{}] - {}",
            timestamp,
            paint(level, &level.as_str()),
            paint(level, &caller.file),
            paint(level, &caller.function),
            paint(level, &caller.line),
            message,
        ),
        None => format!("{} - {} - {}", timestamp, paint(level, &level.as_str()), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CallerContext;
    use chrono::{Local, TimeZone};

    fn record(level: LogLevel, caller: Option<CallerContext>) -> LogRecord {
        LogRecord {
            level,
            message: "sheet updated".to_string(),
            timestamp: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            caller,
        }
    }

    fn caller() -> Option<CallerContext> {
        Some(CallerContext::new("src/excel.rs", "write_cell", 42))
    }

    #[test]
    fn test_plain_format() {
        let line = PlainFormatter::default().format(&record(LogLevel::Info, caller()));
        assert_eq!(
            line,
            "2024-03-09 14:05:07 - INFO - [src/excel.rs:write_cell:42] - sheet updated"
        );
    }

    #[test]
    fn test_color_format() {
        let line = ColorFormatter::default().format(&record(LogLevel::Warning, caller()));
        assert_eq!(
            line,
            "2024-03-09 14:05:07 - \x1b[33mWARNING\x1b[0m - \
             [\x1b[33msrc/excel.rs\x1b[0m:\x1b[33mwrite_cell\x1b[0m:\x1b[33m42\x1b[0m] - \
             \x1b[33msheet updated\x1b[0m"
        );
    }

    #[test]
    fn test_color_per_level() {
        let formatter = ColorFormatter::default();
        let codes = [36, 32, 33, 31, 35];
        for (level, code) in LogLevel::ALL.into_iter().zip(codes) {
            let line = formatter.format(&record(level, caller()));
            assert!(line.starts_with("2024-03-09 14:05:07 - "));
            assert!(line.contains(&format!("\x1b[{code}m{}\x1b[0m", level.as_str())));
        }
    }

    #[test]
    fn test_color_does_not_touch_record() {
        let record = record(LogLevel::Error, caller());
        let colored = ColorFormatter::default().format(&record);
        let plain = PlainFormatter::default().format(&record);

        assert!(colored.contains('\x1b'));
        assert!(!plain.contains('\x1b'));
        assert_eq!(record.message, "sheet updated");
    }

    #[test]
    fn test_missing_caller_is_skipped() {
        let record = record(LogLevel::Debug, None);
        assert_eq!(
            PlainFormatter::default().format(&record),
            "2024-03-09 14:05:07 - DEBUG - sheet updated"
        );
        assert_eq!(
            ColorFormatter::default().format(&record),
            "2024-03-09 14:05:07 - \x1b[36mDEBUG\x1b[0m - \x1b[36msheet updated\x1b[0m"
        );
    }

    #[test]
    fn test_custom_date_format() {
        let line = PlainFormatter::new("%H:%M").format(&record(LogLevel::Info, caller()));
        assert!(line.starts_with("14:05 - INFO - "));
    }
}
