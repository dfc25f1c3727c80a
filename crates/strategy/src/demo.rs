//! Demo setup: a simulation plus a population of reference agents, loaded
//! from JSON or built from defaults.
//!
//! ```json
//! {
//!   "simulation": {
//!     "start": "2024-01-01T00:00:00Z",
//!     "end": "2024-04-01T00:00:00Z",
//!     "granularity": "day",
//!     "assets": [ { "ticker": "XYZ", "seed_price": "100" } ]
//!   },
//!   "market_makers": [
//!     { "name": "mm", "tickers": ["XYZ"], "cash": "1000000", "spread_pct": "0.005", "qty_per_order": 10 }
//!   ],
//!   "random_takers": [
//!     { "name": "noise-1", "tickers": ["XYZ"], "cash": "10000", "seed": 7 }
//!   ]
//! }
//! ```

use agora_core::{Cash, Ticker};
use agora_exchange::config::read_config;
use agora_exchange::ConfigError;
use agora_runner::{Granularity, Simulator, SimulatorConfig};
use chrono::{DateTime, Duration, Utc};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::crossover::{CrossoverTaker, CrossoverTakerConfig};
use crate::error::{Result, StrategyError};
use crate::market_maker::{MarketMakerConfig, NaiveMarketMaker};
use crate::random_taker::{RandomMarketTaker, RandomTakerConfig};

/// One agent to register: identity, funding and strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec<C> {
    pub name: String,
    pub tickers: Vec<Ticker>,
    pub cash: Cash,
    /// RNG seed, ignored by deterministic strategies
    #[serde(default)]
    pub seed: u64,
    #[serde(flatten)]
    pub strategy: C,
}

impl<C> AgentSpec<C> {
    pub fn new(name: impl Into<String>, tickers: &[&str], cash: Cash, seed: u64, strategy: C) -> Self {
        Self {
            name: name.into(),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            cash,
            seed,
            strategy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub simulation: SimulatorConfig,
    #[serde(default)]
    pub market_makers: Vec<AgentSpec<MarketMakerConfig>>,
    #[serde(default)]
    pub crossover_takers: Vec<AgentSpec<CrossoverTakerConfig>>,
    #[serde(default)]
    pub random_takers: Vec<AgentSpec<RandomTakerConfig>>,
}

const DEMO_START: &str = "2024-01-01T00:00:00Z";
const DEMO_DAYS: i64 = 91;

impl DemoConfig {
    /// One asset, one market maker, one crossover taker and three noise takers
    /// trading daily through Q1 2024
    pub fn builtin() -> Result<Self> {
        let start: DateTime<Utc> = DEMO_START
            .parse()
            .map_err(|e| StrategyError::InvalidConfig(format!("demo start {DEMO_START}: {e}")))?;
        let simulation = SimulatorConfig::new(start, start + Duration::days(DEMO_DAYS), Granularity::Day)
            .with_asset("XYZ", Decimal::ONE_HUNDRED);

        let market_makers = vec![AgentSpec::new(
            "market-maker",
            &["XYZ"],
            Decimal::from(1_000_000),
            0,
            MarketMakerConfig {
                spread_pct: Decimal::new(5, 3),
                qty_per_order: 10,
            },
        )];
        let crossover_takers = vec![AgentSpec::new(
            "crossover",
            &["XYZ"],
            Decimal::from(10_000),
            42,
            CrossoverTakerConfig::default(),
        )];
        let random_takers = (1..=3)
            .map(|i| {
                AgentSpec::new(
                    format!("noise-{i}"),
                    &["XYZ"],
                    Decimal::from(10_000),
                    i,
                    RandomTakerConfig::default(),
                )
            })
            .collect();

        Ok(Self {
            simulation,
            market_makers,
            crossover_takers,
            random_takers,
        })
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let content = read_config(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build the simulator and register every agent
    ///
    /// Market makers register first so their quotes are in the book before
    /// takers act on each tick.
    pub fn build(self) -> Result<Simulator> {
        let mut sim = Simulator::from_config(self.simulation)?;

        for spec in self.market_makers {
            let agent = NaiveMarketMaker::new(spec.strategy)?;
            sim.add_agent(spec.name, spec.tickers, spec.cash, agent)?;
        }
        for spec in self.crossover_takers {
            let agent = CrossoverTaker::new(spec.strategy, spec.seed)?;
            sim.add_agent(spec.name, spec.tickers, spec.cash, agent)?;
        }
        for spec in self.random_takers {
            let agent = RandomMarketTaker::new(spec.strategy, spec.seed)?;
            sim.add_agent(spec.name, spec.tickers, spec.cash, agent)?;
        }

        info!("Demo ready with {} agents", sim.agents().count());
        Ok(sim)
    }
}
