mod order;
mod participant;
mod settlement;
mod side;
mod trade;

pub use order::{LimitOrder, OrderId};
pub use participant::{AgentId, Participant};
pub use settlement::{LedgerEntry, Settlement};
pub use side::Side;
pub use trade::{Trade, TradeId};
