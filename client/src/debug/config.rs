//! Logging configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_LOG_LEVEL: &str = "cosmos_sync=info,warn";

/// Log file name inside `log_dir`; the appender adds a date suffix.
pub const LOG_FILE_NAME: &str = "cosmos-sync.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level filter (e.g., "cosmos_sync=debug,info")
    pub log_level: String,
    /// Directory for the daily rotating log
    pub log_dir: PathBuf,
    /// Write the rotating log file besides stdout
    pub file_enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: PathBuf::from("logs"),
            file_enabled: true,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: lookup("COSMOS_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_enabled: lookup("COSMOS_LOG_FILE")
                .map(|v| v != "0")
                .unwrap_or(defaults.file_enabled),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }
}
