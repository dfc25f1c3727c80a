use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::Participant;
use crate::values::{Price, Quantity, Ticker, Timestamp};

/// Unique identifier for a trade
pub type TradeId = Uuid;

/// Trade resulting from matching an incoming order against a resting one
///
/// Immutable once recorded; the exchange keeps these in an append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub ticker: Ticker,
    pub qty: Quantity,
    /// Always the resting order's price
    pub price: Price,
    pub buyer: Participant,
    pub seller: Participant,
    pub timestamp: Timestamp,
}

impl Trade {
    /// Create a new trade with explicit timestamp
    pub fn new(
        ticker: impl Into<Ticker>,
        qty: Quantity,
        price: Price,
        buyer: Participant,
        seller: Participant,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticker: ticker.into(),
            qty,
            price,
            buyer,
            seller,
            timestamp,
        }
    }

    /// Returns the notional value of the trade (price * qty)
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Trade: {} {}@{} {}>",
            self.ticker, self.qty, self.price, self.timestamp
        )
    }
}
