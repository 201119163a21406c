use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde_derive::Deserialize;
use std::str::FromStr;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub fn load_app_config() -> Result<AppConfig> {
    envy::from_env::<AppConfig>()
        .map_err(ConfigError::env_parse)
        .context("Failed to load AppConfig")
}

fn default_create_if_missing() -> bool {
    true
}

fn default_max_connections() -> u32 {
    4
}

#[derive(Deserialize, Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database file
    pub path: String,
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
    // upgrade an older schema instead of failing on open
    #[serde(default)]
    pub auto_migrate: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::missing("STORE_PATH"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::invalid(
                "max_connections",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

pub fn load_store_config() -> Result<StoreConfig> {
    let config = envy::prefixed("STORE_")
        .from_env::<StoreConfig>()
        .map_err(ConfigError::env_parse)
        .context("Failed to load StoreConfig")?;
    config.validate()?;
    Ok(config)
}

#[derive(Deserialize, Debug, Default)]
pub struct InverterConfig {
    #[serde(default)]
    pub serials: Vec<String>,
}

pub fn load_inverter_config() -> Result<InverterConfig> {
    envy::prefixed("INVERTER_")
        .from_env::<InverterConfig>()
        .map_err(ConfigError::env_parse)
        .context("Failed to load InverterConfig")
}
