//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database location and logging settings for FFI/CLI hosts.
//!
//! # Invariants
//! - A blank environment value behaves as if it were unset.
//! - `log_dir`, when present, is absolute.

use crate::logging::{default_log_level, init_logging, LogLevel};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "NOTEPAD_DB_PATH";
pub const LOG_DIR_ENV: &str = "NOTEPAD_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "NOTEPAD_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "notepad.sqlite3";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Reads `NOTEPAD_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = value(LOG_DIR_ENV) {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError {
                    key: LOG_DIR_ENV,
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
            config.log_dir = Some(dir);
        }
        if let Some(level) = value(LOG_LEVEL_ENV) {
            config.log_level = level.parse().map_err(|message| ConfigError {
                key: LOG_LEVEL_ENV,
                message,
            })?;
        }
        Ok(config)
    }

    /// Starts file logging when `log_dir` is configured.
    ///
    /// Returns `Ok(false)` when logging is disabled.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", dir.display()))?;
        init_logging(self.log_level.as_str(), dir)?;
        Ok(true)
    }
}

/// `notepad.sqlite3` in the system temp directory.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
