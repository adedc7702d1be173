//! Application configuration management.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::types::currency::{self, CurrencyTable};
use crate::types::RoundingPolicy;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Application identity.
    #[serde(default)]
    pub app: AppInfo,
    /// Money handling configuration.
    #[serde(default)]
    pub money: MoneyConfig,
}

/// Application name and version, as reported to clients.
#[derive(Debug, Clone, Deserialize)]
pub struct AppInfo {
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Release version.
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

fn default_name() -> String {
    "fms".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Money handling configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoneyConfig {
    /// Rounding policy callers fall back to when they have no better rule.
    #[serde(default)]
    pub default_rounding: RoundingPolicy,
    /// Extra or overridden currency digit counts, keyed by code.
    #[serde(default)]
    pub currencies: HashMap<String, i8>,
}

impl MoneyConfig {
    /// Builds the ISO 4217 table with the configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if a configured code is malformed.
    pub fn currency_table(&self) -> AppResult<CurrencyTable> {
        CurrencyTable::with_overrides(
            self.currencies
                .iter()
                .map(|(code, digits)| (code.as_str(), *digits)),
        )
        .map_err(|err| AppError::Configuration(err.to_string()))
    }

    /// Builds and installs the process-wide currency table.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if a code is malformed or a table is
    /// already in use.
    pub fn install_currencies(&self) -> AppResult<()> {
        currency::install(self.currency_table()?)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FMS").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
