//! Exchange configuration
//!
//! Loaded from JSON; every field has a default so `{}` is a valid config.

use agora_core::Quantity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Exchange-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Fractional digits every submitted price is rounded to
    #[serde(default = "default_price_scale")]
    pub price_scale: u32,

    /// Distance of the seed bid below the seed price, as a fraction
    #[serde(default = "default_seed_pct")]
    pub seed_bid_pct: Decimal,

    /// Distance of the seed ask above the seed price, as a fraction
    #[serde(default = "default_seed_pct")]
    pub seed_ask_pct: Decimal,

    /// Size of the seed trade and of each seed order
    #[serde(default = "default_seed_qty")]
    pub seed_qty: Quantity,
}

fn default_price_scale() -> u32 {
    2
}

fn default_seed_pct() -> Decimal {
    Decimal::new(1, 2)
}

fn default_seed_qty() -> Quantity {
    1
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            price_scale: default_price_scale(),
            seed_bid_pct: default_seed_pct(),
            seed_ask_pct: default_seed_pct(),
            seed_qty: default_seed_qty(),
        }
    }
}

impl ExchangeConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read_config(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Read a config file to a string, mapping the I/O failure to [`ConfigError::Io`]
pub fn read_config(path: impl AsRef<Path>) -> Result<String, ConfigError> {
    std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
        path: path.as_ref().display().to_string(),
        error: e.to_string(),
    })
}

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
