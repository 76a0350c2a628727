//! Logging configuration
//!
//! Settings come from YAML (`.config/trinity/logging.yaml` under the project
//! root, or the file named by `TRINITY_LOG_CONFIG`) and `TRINITY_LOG_*`
//! environment variables.

mod file;

pub use file::{
    default_log_path, project_root, LogConfig, ENV_CONFIG, ENV_LOG_COLOR, ENV_LOG_LEVEL,
    ENV_LOG_PATH, ENV_PROJECT_ROOT,
};
