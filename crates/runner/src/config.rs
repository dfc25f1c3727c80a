//! Simulator configuration
//!
//! ```json
//! {
//!   "start": "2024-01-01T00:00:00Z",
//!   "end": "2024-02-01T00:00:00Z",
//!   "granularity": "day",
//!   "exchange": { "price_scale": 2 },
//!   "assets": [ { "ticker": "XYZ", "seed_price": "100" } ]
//! }
//! ```

use agora_clock::Granularity;
use agora_core::{Price, Ticker, Timestamp};
use agora_exchange::config::read_config;
use agora_exchange::{ConfigError, ExchangeConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration of a simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// First tick (inclusive)
    pub start: Timestamp,

    /// End of the grid (exclusive)
    pub end: Timestamp,

    pub granularity: Granularity,

    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Assets listed before the first tick
    #[serde(default)]
    pub assets: Vec<AssetConfig>,
}

/// An asset to list, with optional per-asset seed spread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub ticker: Ticker,
    pub seed_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_bid_pct: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_ask_pct: Option<Decimal>,
}

impl AssetConfig {
    pub fn new(ticker: impl Into<Ticker>, seed_price: Price) -> Self {
        Self {
            ticker: ticker.into(),
            seed_price,
            seed_bid_pct: None,
            seed_ask_pct: None,
        }
    }
}

impl SimulatorConfig {
    pub fn new(start: Timestamp, end: Timestamp, granularity: Granularity) -> Self {
        Self {
            start,
            end,
            granularity,
            exchange: ExchangeConfig::default(),
            assets: Vec::new(),
        }
    }

    /// Add an asset seeded with the exchange's default spread
    pub fn with_asset(mut self, ticker: impl Into<Ticker>, seed_price: Price) -> Self {
        self.assets.push(AssetConfig::new(ticker, seed_price));
        self
    }

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
