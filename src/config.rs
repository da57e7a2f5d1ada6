//! Resolver configuration
//!
//! Loaded from a JSON file, from `SYNC_GRANTS_*` environment variables, or
//! both (environment wins).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{GrantError, GrantResult};

const ENV_STRICT_LOCATORS: &str = "SYNC_GRANTS_STRICT_LOCATORS";
const ENV_STORE_DIR: &str = "SYNC_GRANTS_STORE_DIR";
const ENV_LOG_LEVEL: &str = "SYNC_GRANTS_LOG_LEVEL";
const ENV_LOG_JSON: &str = "SYNC_GRANTS_LOG_JSON";
const ENV_LOG_DIR: &str = "SYNC_GRANTS_LOG_DIR";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// Write to a daily-rolling file in this directory instead of stderr
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            directory: None,
        }
    }
}

/// Configuration for a [`GrantResolver`](crate::resolver::GrantResolver)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Reject locators that do not decode instead of treating them as empty
    #[serde(default)]
    pub strict_locators: bool,

    /// Directory for the JSON-lines store
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    #[serde(default)]
    pub log: LogConfig,
}

impl ResolverConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Defaults overlaid with the environment
    pub fn from_env() -> GrantResult<Self> {
        Self::default().apply_env()
    }

    /// Overlay `SYNC_GRANTS_*` variables onto this configuration
    pub fn apply_env(self) -> GrantResult<Self> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> GrantResult<Self> {
        if let Some(value) = var(ENV_STRICT_LOCATORS) {
            self.strict_locators = parse_bool(ENV_STRICT_LOCATORS, &value)?;
        }
        if let Some(value) = var(ENV_STORE_DIR) {
            self.store_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = var(ENV_LOG_LEVEL) {
            self.log.level = value;
        }
        if let Some(value) = var(ENV_LOG_JSON) {
            self.log.json = parse_bool(ENV_LOG_JSON, &value)?;
        }
        if let Some(value) = var(ENV_LOG_DIR) {
            self.log.directory = Some(PathBuf::from(value));
        }
        Ok(self)
    }

    /// Set strict locator decoding
    pub fn with_strict_locators(mut self, strict: bool) -> Self {
        self.strict_locators = strict;
        self
    }

    /// Set the store directory
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    /// Set the logging configuration
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

fn parse_bool(name: &str, value: &str) -> GrantResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(GrantError::invalid_config(format!(
            "{name} must be a boolean, got {other:?}"
        ))),
    }
}
