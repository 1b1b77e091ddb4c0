//! Startup configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags:
//!
//! ```yaml
//! database: /var/lib/ouidb/oui.db
//! log_level: 6        # syslog priority, 0 (emerg) .. 7 (debug)
//! log_file: /var/log/ouidb.log
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::database::DEFAULT_DB_PATH;
use crate::{Error, Result};

/// Syslog priority for `notice`.
pub const DEFAULT_LOG_LEVEL: u8 = 5;

/// Highest syslog priority (`debug`).
pub const MAX_LOG_LEVEL: u8 = 7;

/// Resolved startup settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the database file
    pub database: PathBuf,
    /// Amount of logging, as a syslog priority
    pub log_level: u8,
    /// Log destination; stderr when unset
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DB_PATH),
            log_level: DEFAULT_LOG_LEVEL,
            log_file: None,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub log_level: Option<u8>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Parse a YAML config document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()
    }

    /// Load a config file. The file must exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read config file {:?}: {}", path, e)))?;
        Self::from_yaml(&content)
    }

    /// Load the config file if one was given, then apply overrides.
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.with_overrides(overrides).validate()
    }

    /// Replace settings with any values present in `overrides`.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self
    }

    fn validate(self) -> Result<Self> {
        if self.log_level > MAX_LOG_LEVEL {
            return Err(Error::Config(format!(
                "log level must be 0..={}, got {}",
                MAX_LOG_LEVEL, self.log_level
            )));
        }
        Ok(self)
    }
}
