//! Application configuration.
//!
//! Resolution order, lowest to highest precedence: built-in defaults, TOML
//! file, `MOODJOURNAL_DB_PATH` environment variable, CLI flags (applied by
//! the caller).

use crate::render::RawHtml;
use moodjournal_core::{init_logging, LogLevel, LoggingError, UpdatePolicy};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "MOODJOURNAL_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "moodjournal.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: LogLevel,
    /// Absolute directory for rolling log files. File logging is off when unset.
    pub log_dir: Option<PathBuf>,
    pub update_policy: UpdatePolicy,
    pub raw_html: RawHtml,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: LogLevel::default(),
            log_dir: None,
            update_policy: UpdatePolicy::default(),
            raw_html: RawHtml::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path` when given (defaults otherwise), then applies the
    /// environment override.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };
        Ok(config.with_db_path_override(std::env::var(DB_PATH_ENV).ok()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Replaces `db_path` with a non-blank override.
    pub fn with_db_path_override(mut self, raw: Option<String>) -> Self {
        if let Some(raw) = raw {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.db_path = PathBuf::from(trimmed);
            }
        }
        self
    }

    /// Starts file logging when `log_dir` is configured.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        match self.log_dir.as_deref() {
            Some(dir) => init_logging(self.log_level, dir),
            None => Ok(()),
        }
    }
}
