//! Agora Runner - discrete-time simulation driver
//!
//! Owns the exchange and the registered agents and advances simulated time
//! over a pre-computed grid. Each tick runs in three strictly ordered steps:
//!
//! ```text
//!   clock.advance() ──► exchange.set_clock(t)
//!                              │
//!                              ▼
//!   ┌──────────────────────────────────────────────┐
//!   │ for agent in registration order:             │
//!   │     agent.next(&mut AgentContext)            │──► orders, cancels
//!   └──────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!   settle(): drain pending settlements into ledgers (once per tick)
//! ```
//!
//! Balances change only in `settle`, so every agent observes a cash value
//! consistent with exactly the trades completed before the last drain.

pub mod account;
pub mod agent;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod registry;
pub mod simulation;

// Re-export main types
pub use account::{AgentAccount, CashPoint};
pub use agent::{Agent, AgentContext};
pub use config::{AssetConfig, SimulatorConfig};
pub use error::{Result, SimulationError};
pub use portfolio::PortfolioPoint;
pub use registry::AgentRegistry;
pub use simulation::{RunSummary, Simulator};

pub use agora_clock::{ClockState, Granularity};
