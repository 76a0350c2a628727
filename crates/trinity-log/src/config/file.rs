//! Logging configuration (YAML file + environment)
//!
//! Resolution order: built-in defaults, then the YAML file named by
//! `TRINITY_LOG_CONFIG` (or `<project root>/.config/trinity/logging.yaml`),
//! then the environment overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LogError, LogResult};
use crate::format::DEFAULT_DATE_FORMAT;
use crate::level::LogLevel;
use crate::sinks::ConsoleTarget;

/// Environment variable naming the project root
pub const ENV_PROJECT_ROOT: &str = "TRINITY_PROJECT_ROOT";
/// Environment variable naming a YAML config file
pub const ENV_CONFIG: &str = "TRINITY_LOG_CONFIG";
/// Environment variable overriding the default log file
pub const ENV_LOG_PATH: &str = "TRINITY_LOG_PATH";
/// Environment variable overriding both sink thresholds
pub const ENV_LOG_LEVEL: &str = "TRINITY_LOG_LEVEL";
/// Environment variable enabling or disabling console colors
pub const ENV_LOG_COLOR: &str = "TRINITY_LOG_COLOR";

/// Logging settings shared by every logger a manager creates
///
/// # Example
///
/// ```
/// use trinity_log::{LogConfig, LogLevel};
///
/// let config: LogConfig = serde_yaml::from_str("color: false\nfile_level: info").unwrap();
/// assert!(!config.color);
/// assert_eq!(config.file_level, LogLevel::Info);
/// assert_eq!(config.console_level, LogLevel::Debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// File for the default logger; `None` means `<project root>/log/app.log`
    pub log_path: Option<PathBuf>,
    /// `strftime` pattern of the timestamp column
    pub date_format: String,
    /// Colorize console output
    pub color: bool,
    /// Console stream
    pub console: ConsoleTarget,
    /// Lowest level written to the console
    pub console_level: LogLevel,
    /// Lowest level written to log files
    pub file_level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            color: true,
            console: ConsoleTarget::Stderr,
            console_level: LogLevel::Debug,
            file_level: LogLevel::Debug,
        }
    }
}

impl LogConfig {
    /// Load config from a YAML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> LogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| LogError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| LogError::Config(format!("Failed to parse YAML in {}: {}", path.display(), e)))
    }

    /// Build the config from the process environment
    pub fn from_env() -> LogResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] with an explicit variable lookup
    pub fn from_lookup<F>(lookup: F) -> LogResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = lookup(ENV_CONFIG)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| workspace_config_path(&project_root_from(&lookup)));

        let mut config = Self::load(file)?;
        config.apply_overrides(&lookup)?;
        if config.log_path.is_none() {
            config.log_path = Some(default_log_path_from(&lookup));
        }
        Ok(config)
    }

    /// Apply `TRINITY_LOG_PATH`, `TRINITY_LOG_LEVEL`, `TRINITY_LOG_COLOR` and `NO_COLOR`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> LogResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_LOG_PATH).filter(|value| !value.is_empty()) {
            self.log_path = Some(PathBuf::from(path));
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.is_empty()) {
            let level: LogLevel = level.parse()?;
            self.console_level = level;
            self.file_level = level;
        }

        if let Some(color) = lookup(ENV_LOG_COLOR) {
            self.color = !matches!(color.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off");
        }

        // https://no-color.org: any non-empty value disables color
        if lookup("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            self.color = false;
        }

        Ok(())
    }

    /// The default logger's file, falling back to `<project root>/log/app.log`
    pub fn log_path(&self) -> PathBuf {
        self.log_path.clone().unwrap_or_else(default_log_path)
    }

    /// Set the default logger's file
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Enable or disable console colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Root directory of the running project
///
/// `TRINITY_PROJECT_ROOT` if set, else the current directory, else the
/// user's home directory.
pub fn project_root() -> PathBuf {
    project_root_from(|key| env::var(key).ok())
}

/// Conventional log file of the project: `<project root>/log/app.log`
pub fn default_log_path() -> PathBuf {
    default_log_path_from(|key| env::var(key).ok())
}

fn project_root_from<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(ENV_PROJECT_ROOT)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_log_path_from<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    project_root_from(lookup).join("log").join("app.log")
}

fn workspace_config_path(root: &Path) -> PathBuf {
    root.join(".config").join("trinity").join("logging.yaml")
}
