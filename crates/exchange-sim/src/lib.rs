//! Agora Exchange
//!
//! The synthetic exchange at the centre of a simulation run. It owns one
//! [`OrderBook`](agora_matching::OrderBook) per listed ticker and the
//! append-only trade log, runs price-time matching for every submission and
//! queues the cash/position legs of each trade for the simulator to settle.
//!
//! ```text
//!   limit_buy / limit_sell / market_buy / market_sell / cancel
//!                     │
//!                     ▼
//!   ┌────────────────────────────────┐
//!   │ Exchange                       │
//!   │   books ──► price-time match   │──► trade_log
//!   │                                │──► pending settlements
//!   └────────────────────────────────┘
//!                     │
//!                     ▼
//!   quotes / midprice / order_book / trades / price_bars
//! ```

pub mod config;
pub mod error;
pub mod exchange;
pub mod market_data;

pub use config::{ConfigError, ExchangeConfig};
pub use error::{ExchangeError, Result};
pub use exchange::{Exchange, MarketExecution};
pub use market_data::{PriceBar, Quotes};

pub use agora_matching::BookSnapshot;
