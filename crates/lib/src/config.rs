//! # Client Configuration
//!
//! Defines [`SheetDbConfig`] and loads it in layers: built-in defaults, an
//! optional YAML file, then `SHEETDB_`-prefixed environment variables
//! (`SHEETDB_BASE_URL`, `SHEETDB_TIMEOUT_MS`, `SHEETDB_MAX_ATTEMPTS`,
//! `SHEETDB_BASE_DELAY_MS`, `SHEETDB_CACHE_BUST`).

use crate::constants::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_MS,
    ENV_PREFIX,
};
use crate::errors::ConfigError;
use crate::retry::RetryPolicy;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Settings for the SheetDB client and its retry behaviour.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SheetDbConfig {
    /// The SheetDB API endpoint, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for a single attempt of the retrying fetcher, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Whether to append the `_ts` timestamp to every request.
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}

fn default_cache_bust() -> bool {
    true
}

impl Default for SheetDbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            cache_bust: default_cache_bust(),
        }
    }
}

impl SheetDbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The retry policy described by `max_attempts` and `base_delay_ms`.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

/// Loads the configuration, optionally layering a YAML file under the environment.
///
/// A path that is given but does not exist is an error.
pub fn load_config(config_path: Option<&str>) -> Result<SheetDbConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    if let Some(path) = config_path {
        if !Path::new(path).exists() {
            return Err(ConfigError::NotFound(path.to_string()));
        }
        info!("Loading SheetDB configuration from '{path}'.");
        builder = builder.add_source(File::new(path, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
