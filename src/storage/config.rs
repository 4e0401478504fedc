//! Configuration handling for doclinks
//!
//! Configuration is read from the first of:
//! 1. an explicit `--config` path
//! 2. the nearest `doclinks.toml`, walking up from the current directory
//! 3. `config.toml` in the platform config directory
//!    (e.g. `~/.config/doclinks/config.toml`)
//!
//! Missing files fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{END_OF_DOCUMENT, LINKS_PER_LINE};

/// File name looked up in the working directory and its ancestors
pub const LOCAL_CONFIG_FILE: &str = "doclinks.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Links per rendered line
    pub links_per_line: usize,

    /// Line that ends a document body
    pub terminator: String,

    /// Number of document slots available to scripts
    pub slots: usize,

    /// Output format when `--format` is not given
    pub default_format: OutputFormat,

    /// File the configuration came from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            links_per_line: LINKS_PER_LINE,
            terminator: END_OF_DOCUMENT.to_string(),
            slots: 10,
            default_format: OutputFormat::Text,
            source: None,
        }
    }
}

impl Config {
    /// Loads configuration, preferring an explicit path
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let local = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::find_local(&cwd));
        if let Some(path) = local {
            return Self::from_file(&path);
        }

        match Self::global_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reads and validates a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses and validates TOML configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.links_per_line == 0 {
            return Err(ConfigError::Invalid(
                "links_per_line must be at least 1".to_string(),
            ));
        }
        if self.slots == 0 {
            return Err(ConfigError::Invalid("slots must be at least 1".to_string()));
        }
        if self.terminator.is_empty() {
            return Err(ConfigError::Invalid(
                "terminator cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "doclinks", "doclinks")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Finds the nearest `doclinks.toml` at or above `start`
    pub fn find_local(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(LOCAL_CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Serializes the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
