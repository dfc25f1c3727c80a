use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Participant, Side};
use crate::values::{Price, Quantity, Ticker, Timestamp};

/// Unique identifier for an order
pub type OrderId = Uuid;

/// A limit order, either resting in a book or just returned from submission
///
/// `qty` is the unfilled remainder. Only the matching algorithm changes it,
/// and an order whose remainder reaches zero never stays in a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrder {
    pub id: OrderId,
    pub ticker: Ticker,
    pub side: Side,
    pub price: Price,
    pub qty: Quantity,
    pub creator: Participant,
    /// Simulation clock value at creation
    pub timestamp: Timestamp,
}

impl LimitOrder {
    /// Create a new order with a freshly generated id
    pub fn new(
        ticker: impl Into<Ticker>,
        side: Side,
        price: Price,
        qty: Quantity,
        creator: Participant,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticker: ticker.into(),
            side,
            price,
            qty,
            creator,
            timestamp,
        }
    }

    /// Returns true once nothing is left to fill
    pub fn is_filled(&self) -> bool {
        self.qty == 0
    }

    /// Notional value of the unfilled remainder (price * qty)
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

impl fmt::Display for LimitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<LimitOrder: {} {} {}@{}>",
            self.ticker, self.side, self.qty, self.price
        )
    }
}
