//! Agora Core Domain
//!
//! Pure domain types for the Agora market simulator.
//! This crate contains no I/O and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AgentId, LedgerEntry, LimitOrder, OrderId, Participant, Settlement, Side, Trade, TradeId,
};
pub use values::{Cash, MAX_QUANTITY, Price, Quantity, SignedQuantity, Ticker, Timestamp};
