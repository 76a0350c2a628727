//! Error reports attached to critical and assertion records

use std::error::Error;
use std::fmt;

/// A rendered snapshot of an error value and its `source()` chain
///
/// # Example
///
/// ```
/// use trinity_log::ErrorReport;
///
/// let err = "abc".parse::<u32>().unwrap_err();
/// let report = ErrorReport::new(&err);
/// assert!(report.type_name().ends_with("ParseIntError"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    type_name: String,
    message: String,
    causes: Vec<String>,
}

impl ErrorReport {
    /// Capture the type name, message and cause chain of `error`
    ///
    /// For trait objects (`&*Box<dyn Error>`) the static type says nothing,
    /// so the name is taken from the leading type name of the error's
    /// `Debug` output when it has one.
    pub fn new<E: Error + ?Sized>(error: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            type_name: type_name_of(error),
            message: error.to_string(),
            causes,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Messages of the error's sources, outermost first
    pub fn causes(&self) -> &[String] {
        &self.causes
    }
}

impl<E: Error> From<&E> for ErrorReport {
    fn from(error: &E) -> Self {
        Self::new(error)
    }
}

fn type_name_of<E: Error + ?Sized>(error: &E) -> String {
    let static_name = std::any::type_name::<E>();
    if !static_name.starts_with("dyn ") {
        return static_name.to_string();
    }
    let debug = format!("{error:?}");
    debug_type_name(&debug).unwrap_or(static_name).to_string()
}

/// `ParseIntError` from `ParseIntError { kind: InvalidDigit }`, `Timeout`
/// from `Timeout(30)`. Unit variants and quoted strings yield nothing.
fn debug_type_name(debug: &str) -> Option<&str> {
    let end = debug
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ':'))
        .unwrap_or(debug.len());
    let name = &debug[..end];
    let structured = matches!(debug[end..].chars().next(), Some(' ' | '(' | '{'));
    let is_type = name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    (structured && is_type).then_some(name)
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)?;
        if !self.causes.is_empty() {
            write!(f, "\nCaused by:")?;
            for (index, cause) in self.causes.iter().enumerate() {
                write!(f, "\n  {index}: {cause}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("loading workbook failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_report_captures_chain() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::NotFound, "sales.xlsx missing"));
        let report = ErrorReport::new(&err);

        assert!(report.type_name().ends_with("Outer"));
        assert_eq!(report.message(), "loading workbook failed");
        assert_eq!(report.causes(), ["sales.xlsx missing".to_string()]);

        let rendered = report.to_string();
        assert!(rendered.contains("Outer: loading workbook failed"));
        assert!(rendered.contains("Caused by:\n  0: sales.xlsx missing"));
    }

    #[test]
    fn test_boxed_error_reports_concrete_type() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new("4x".parse::<i32>().unwrap_err());
        let report = ErrorReport::new(&*boxed);

        assert_eq!(report.type_name(), "ParseIntError");
        assert_eq!(
            report.to_string(),
            "ParseIntError: invalid digit found in string"
        );
    }

    #[test]
    fn test_boxed_string_error_keeps_static_name() {
        let boxed: Box<dyn Error> = "sheet locked".into();
        let report = ErrorReport::new(&*boxed);
        assert!(report.type_name().starts_with("dyn "));
        assert_eq!(report.message(), "sheet locked");
    }

    #[test]
    fn test_debug_type_name() {
        assert_eq!(debug_type_name("ParseIntError { kind: Empty }"), Some("ParseIntError"));
        assert_eq!(debug_type_name("Timeout(30)"), Some("Timeout"));
        assert_eq!(debug_type_name("\"quoted\""), None);
        assert_eq!(debug_type_name("Closed"), None);
        assert_eq!(debug_type_name("lower { x: 1 }"), None);
    }

    #[test]
    fn test_report_without_source() {
        let err = std::fmt::Error;
        let report = ErrorReport::from(&err);
        assert!(report.type_name().ends_with("fmt::Error"));
        assert!(!report.to_string().contains("Caused by"));
    }
}
