//! Application configuration management.
//!
//! Configuration is stored at `~/.config/barcart/config.json`. Every field is
//! optional; environment variables (`BARCART_API_BASE_URL`,
//! `BARCART_CACHE_DIR`, `BARCART_DATA_DIR`) take precedence over the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::client::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Application name used for config/cache/data directory paths
const APP_NAME: &str = "barcart";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Subdirectory of the cache dir holding one file per cached recipe
const RECIPE_CACHE_DIR: &str = "recipes";

const ENV_API_BASE_URL: &str = "BARCART_API_BASE_URL";
const ENV_CACHE_DIR: &str = "BARCART_CACHE_DIR";
const ENV_DATA_DIR: &str = "BARCART_DATA_DIR";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load the config file (defaults if absent), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_API_BASE_URL) {
            self.api_base_url = Some(url);
        }
        if let Some(dir) = get(ENV_CACHE_DIR) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Root cache directory; logs and the recipe cache live below it.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn recipe_cache_dir(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join(RECIPE_CACHE_DIR))
    }

    /// Directory holding the favorites list.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
