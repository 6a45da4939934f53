use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sizing and reclamation settings for `TripleIndexCache`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Capacity reserved up front in the arena and each index
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Number of queued stale entries that triggers an automatic drain.
    /// Values below 1 behave like 1.
    #[serde(default = "default_reclaim_threshold")]
    pub reclaim_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_demo_name")]
    pub name: String,
    #[serde(default = "default_demo_url")]
    pub url: String,
    /// Logo file to load; a generated placeholder is used when unset
    pub image_path: Option<PathBuf>,
    /// Name used for the rename step, defaults to "new <name>"
    pub renamed_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_initial_capacity() -> usize {
    DEFAULT_INITIAL_CAPACITY
}

fn default_reclaim_threshold() -> usize {
    DEFAULT_RECLAIM_THRESHOLD
}

fn default_demo_name() -> String {
    DEFAULT_DEMO_NAME.to_string()
}

fn default_demo_url() -> String {
    DEFAULT_DEMO_URL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            reclaim_threshold: default_reclaim_threshold(),
        }
    }
}

impl CacheConfig {
    pub fn effective_reclaim_threshold(&self) -> usize {
        self.reclaim_threshold.max(1)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            name: default_demo_name(),
            url: default_demo_url(),
            image_path: None,
            renamed_to: None,
        }
    }
}

impl DemoConfig {
    pub fn renamed_to(&self) -> String {
        self.renamed_to
            .clone()
            .unwrap_or_else(|| format!("new {}", self.name))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(config_file).exists() {
            let contents = std::fs::read_to_string(config_file)
                .with_context(|| format!("Failed to read config file {}", config_file))?;
            let config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", config_file))?;
            info!("Configuration loaded from: {}", config_file);
            Ok(config)
        } else {
            info!("No config file at {}, using defaults", config_file);
            Ok(Self::default())
        }
    }
}
