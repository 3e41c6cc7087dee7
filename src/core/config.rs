//! Logger configuration
//!
//! A [`LoggerConfig`] is built once at process start, from defaults, the
//! environment, or a JSON document, and never changes afterwards.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Logger name used when none is configured
pub const DEFAULT_LOGGER_NAME: &str = "Your Log";

/// Directory holding the dated default log file
pub const DEFAULT_LOG_DIR: &str = "log";

/// Size cap of the live log file before it is rotated out (10 MiB)
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Number of rotated backups kept next to the live file
pub const DEFAULT_MAX_BACKUPS: usize = 5;

pub const ENV_LOG_FILE: &str = "INSTRUMENTED_LOG_FILE";
pub const ENV_LOGGER_NAME: &str = "INSTRUMENTED_LOG_NAME";
pub const ENV_DEBUG: &str = "INSTRUMENTED_LOG_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Path of the live log file
    #[serde(default = "default_log_file_path")]
    pub log_file_path: PathBuf,

    /// Logger identity; one handle exists per name
    #[serde(default = "default_logger_name")]
    pub logger_name: String,

    /// Debug mode: DEBUG threshold and a console sink
    #[serde(default = "default_true")]
    pub debug: bool,

    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_file_path: default_log_file_path(),
            logger_name: default_logger_name(),
            debug: true,
            max_bytes: default_max_bytes(),
            max_backups: default_max_backups(),
        }
    }
}

/// `log/<YYYY-MM-DD>` for the current local date
pub fn default_log_file_path() -> PathBuf {
    Path::new(DEFAULT_LOG_DIR).join(Local::now().format("%Y-%m-%d").to_string())
}

fn default_logger_name() -> String {
    DEFAULT_LOGGER_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

fn default_max_backups() -> usize {
    DEFAULT_MAX_BACKUPS
}

impl LoggerConfig {
    /// # Examples
    ///
    /// ```
    /// use instrumented_log::{LogLevel, LoggerConfig};
    ///
    /// let config = LoggerConfig::new("log/app.log", "app", false);
    /// assert_eq!(config.level(), LogLevel::Info);
    /// assert!(!config.console_enabled());
    /// ```
    pub fn new(log_file_path: impl Into<PathBuf>, logger_name: impl Into<String>, debug: bool) -> Self {
        Self {
            log_file_path: log_file_path.into(),
            logger_name: logger_name.into(),
            debug,
            ..Self::default()
        }
    }

    /// Defaults overridden by `INSTRUMENTED_LOG_FILE`, `INSTRUMENTED_LOG_NAME`
    /// and `INSTRUMENTED_LOG_DEBUG`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_LOG_FILE).filter(|v| !v.is_empty()) {
            config.log_file_path = PathBuf::from(path);
        }
        if let Some(name) = lookup(ENV_LOGGER_NAME).filter(|v| !v.is_empty()) {
            config.logger_name = name;
        }
        if let Some(flag) = lookup(ENV_DEBUG) {
            config.debug = parse_flag(&flag).ok_or_else(|| {
                LoggerError::config(ENV_DEBUG, format!("expected a boolean, got '{}'", flag))
            })?;
        }

        Ok(config)
    }

    /// Load a JSON document; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_rotation(mut self, max_bytes: u64, max_backups: usize) -> Self {
        self.max_bytes = max_bytes;
        self.max_backups = max_backups;
        self
    }

    /// Severity threshold applied to every sink
    #[must_use]
    pub fn level(&self) -> LogLevel {
        LogLevel::threshold(self.debug)
    }

    #[must_use]
    pub fn console_enabled(&self) -> bool {
        self.debug
    }

    pub fn validate(&self) -> Result<()> {
        if self.logger_name.trim().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "logger_name must not be empty"));
        }
        if self.log_file_path.as_os_str().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "log_file_path must not be empty"));
        }
        if self.max_bytes == 0 {
            return Err(LoggerError::config(
                "RotationPolicy",
                "max_bytes must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
