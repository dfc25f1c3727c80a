//! Agora Strategy - reference agents
//!
//! Ready-made [`Agent`](agora_runner::Agent) implementations and the demo
//! population used by the `agora-sim` binary:
//!
//! - [`RandomMarketTaker`]: noise trader sending market orders at fixed odds
//! - [`NaiveMarketMaker`]: requotes a bid/ask pair around the last trade
//! - [`CrossoverTaker`]: market taker biased by a moving-average crossover
//!
//! Strategy parameters are validated when the agent is built, so a bad
//! config never surfaces in the middle of a run.

pub mod crossover;
pub mod demo;
pub mod error;
pub mod market_maker;
pub mod random_taker;

pub use crossover::{CrossoverConfig, CrossoverTaker, CrossoverTakerConfig, MovingAverageCrossover, Weights};
pub use demo::{AgentSpec, DemoConfig};
pub use error::{Result, StrategyError};
pub use market_maker::{MarketMakerConfig, NaiveMarketMaker};
pub use random_taker::{RandomMarketTaker, RandomTakerConfig, TakerAction};
