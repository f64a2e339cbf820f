use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::SpendlyError,
    utils::paths::{self, ensure_dir, write_atomic},
};

/// Environment variable that overrides the configured API endpoint.
pub const API_URL_ENV: &str = "SPENDLY_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub locale: String,
    pub default_currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            locale: "en-US".into(),
            default_currency: "USD".into(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Applies `SPENDLY_API_URL` when it is set to a non-empty value.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                tracing::debug!(url, "api url overridden from environment");
                self.api_base_url = url.to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<(), SpendlyError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SpendlyError::Config(format!(
                "api_base_url `{}` must start with http:// or https://",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(SpendlyError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        let currency = self.default_currency.trim();
        if currency.len() != 3 || !currency.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(SpendlyError::Config(format!(
                "default_currency `{}` is not an ISO 4217 code",
                self.default_currency
            )));
        }
        Ok(())
    }
}

/// Loads and stores [`Config`] as JSON under the application data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, SpendlyError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, SpendlyError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
        })
    }

    /// Reads the stored configuration, falling back to defaults when no file
    /// exists yet. Environment overrides are applied before validation.
    pub fn load(&self) -> Result<Config, SpendlyError> {
        let mut config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), SpendlyError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
