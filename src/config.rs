//! Converter configuration, read from TOML
//!
//! ```toml
//! delay_ms = 250
//! pivot = "USD"
//! identity_policy = "legacy"
//! missing_rate_policy = "reject"
//! race_policy = "last_finished"
//! rates_file = "rates.csv"
//! ```

use crate::currency::Currency;
use crate::error::{ConverterError, Result};
use crate::fx::{IdentityPolicy, MissingRatePolicy, RateResolver, RateTable};
use crate::session::{SessionConfig, DEFAULT_DELAY};
use crate::state::RacePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the home directory holding `config.toml`
pub const CONFIG_DIR: &str = ".fxconv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Simulated conversion latency in milliseconds
    pub delay_ms: u64,
    pub pivot: Currency,
    pub identity_policy: IdentityPolicy,
    pub missing_rate_policy: MissingRatePolicy,
    pub race_policy: RacePolicy,
    /// CSV rate table replacing the reference rates
    pub rates_file: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            pivot: Currency::USD,
            identity_policy: IdentityPolicy::default(),
            missing_rate_policy: MissingRatePolicy::default(),
            race_policy: RacePolicy::default(),
            rates_file: None,
        }
    }
}

impl ConverterConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ConverterError::ConfigError(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// `~/.fxconv/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`
    ///
    /// Unreadable or malformed files fall back to the defaults with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let candidate = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let Some(config_path) = candidate else {
            return Self::default();
        };

        match Self::from_path(&config_path) {
            Ok(config) => {
                log::debug!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load config {}: {}; using defaults",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Rates from `rates_file`, or the reference table
    pub fn rate_table(&self) -> Result<RateTable> {
        match &self.rates_file {
            Some(path) => RateTable::from_path(path),
            None => Ok(RateTable::reference()),
        }
    }

    pub fn resolver(&self) -> Result<RateResolver<RateTable>> {
        Ok(RateResolver::with_config(
            self.rate_table()?,
            self.pivot,
            self.identity_policy,
            self.missing_rate_policy,
        ))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            delay: Duration::from_millis(self.delay_ms),
            race_policy: self.race_policy,
        }
    }
}
