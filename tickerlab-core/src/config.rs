//! Process configuration.
//!
//! Loaded from an optional TOML file, then overridden by environment variables
//! (a `.env` file in the working directory is honored):
//!
//! - `ALPHA_VANTAGE_API_KEY`
//! - `ALPHA_VANTAGE_RATE_LIMIT` (calls per minute)
//! - `TICKERLAB_DATABASE_PATH`
//!
//! ```toml
//! [provider]
//! rate_limit_per_minute = 5
//!
//! [storage]
//! database_path = "tickerlab.db"
//!
//! [indicators]
//! lookback_days = 200
//! ```

use crate::data::alpha_vantage::DEFAULT_BASE_URL;
use crate::engine::{DEFAULT_LOOKBACK_DAYS, MIN_HISTORY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("no API key configured; set ALPHA_VANTAGE_API_KEY or provider.api_key")]
    MissingApiKey,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub storage: StorageConfig,
    pub indicators: IndicatorConfig,
}

/// `[provider]`: the Alpha Vantage endpoint and its call budget.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub rate_limit_per_minute: u32,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit_per_minute: 5,
            timeout_secs: 30,
        }
    }
}

// Hand-written so the key never reaches logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// `[storage]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("tickerlab.db"),
        }
    }
}

/// `[indicators]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Most recent price records fed to the engine.
    pub lookback_days: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Full load: `.env`, optional file, process environment, validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();

        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup function.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("ALPHA_VANTAGE_API_KEY") {
            let key = key.trim().to_string();
            if !key.is_empty() {
                self.provider.api_key = Some(key);
            }
        }

        if let Some(rate) = lookup("ALPHA_VANTAGE_RATE_LIMIT") {
            self.provider.rate_limit_per_minute =
                rate.trim().parse().map_err(|e| ConfigError::Invalid {
                    key: "ALPHA_VANTAGE_RATE_LIMIT",
                    reason: format!("'{rate}': {e}"),
                })?;
        }

        if let Some(path) = lookup("TICKERLAB_DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.rate_limit_per_minute == 0 {
            return Err(ConfigError::Invalid {
                key: "provider.rate_limit_per_minute",
                reason: "must be at least 1".into(),
            });
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "provider.timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        if self.indicators.lookback_days < MIN_HISTORY {
            return Err(ConfigError::Invalid {
                key: "indicators.lookback_days",
                reason: format!("must be at least {MIN_HISTORY}"),
            });
        }
        Ok(())
    }

    /// The API key, required only by commands that call the provider.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.provider
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}
