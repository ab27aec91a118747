//! Configuration loading for the projects CLI.
//!
//! Looks for `projects.toml` in the working directory, then
//! `<config_dir>/projects/config.toml`; falls back to defaults under the
//! platform data directory.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "projects";
const LOCAL_CONFIG_FILE: &str = "projects.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Database location
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; defaults to `<data_dir>/projects/projects.db`
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace|debug|info|warn|error; defaults by build mode
    pub level: Option<String>,
    /// Absolute log directory; defaults to `<data_dir>/projects/logs`
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                bail!("database.path cannot be empty");
            }
        }

        if let Some(level) = &self.logging.level {
            if projects_core::parse_level(level).is_err() {
                bail!("logging.level '{}' is not one of trace|debug|info|warn|error", level);
            }
        }

        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                bail!("logging.dir must be an absolute path, got '{}'", dir.display());
            }
        }

        Ok(())
    }

    /// Effective database file path
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("projects.db")),
        }
    }

    /// Effective log directory
    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.logging.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("logs")),
        }
    }

    /// Effective log level
    pub fn log_level(&self) -> &str {
        self.logging
            .level
            .as_deref()
            .unwrap_or(projects_core::default_log_level())
    }

    fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join(APP_DIR_NAME))
    }
}
