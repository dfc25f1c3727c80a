use agora_core::{LimitOrder, OrderId, Participant, Price, Quantity, Side};
use rust_decimal::Decimal;

use crate::OrderBook;

/// One execution against a resting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub maker_order_id: OrderId,
    /// Creator of the resting order
    pub maker: Participant,
    /// Always the resting order's price
    pub price: Price,
    pub qty: Quantity,
}

impl Fill {
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// Result of submitting a limit order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitOutcome {
    /// The submitted order with its unfilled remainder.
    /// If `qty > 0` the order now rests in the book.
    pub order: LimitOrder,
    /// Fills in execution order
    pub fills: Vec<Fill>,
}

impl LimitOutcome {
    /// True if a remainder was left resting in the book
    pub fn rested(&self) -> bool {
        self.order.qty > 0
    }

    pub fn filled(&self) -> Quantity {
        self.fills.iter().map(|f| f.qty).sum()
    }
}

/// Result of submitting a market order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketOutcome {
    pub requested: Quantity,
    pub fills: Vec<Fill>,
}

impl MarketOutcome {
    pub fn filled(&self) -> Quantity {
        self.fills.iter().map(|f| f.qty).sum()
    }

    /// Requested quantity that found no liquidity
    pub fn unfilled(&self) -> Quantity {
        self.requested - self.filled()
    }

    pub fn notional(&self) -> Decimal {
        self.fills.iter().map(Fill::notional).sum()
    }
}

impl OrderBook {
    /// Match an incoming limit order against the opposite side, resting any remainder
    ///
    /// Matching stops at the first opposite order whose price does not cross.
    /// Each fill executes at the resting order's price.
    pub fn submit_limit(&mut self, mut order: LimitOrder) -> LimitOutcome {
        let opposite = order.side.opposite();
        let mut fills = Vec::new();

        while order.qty > 0 {
            let crosses = match self.side(opposite).best() {
                Some(resting) => order.side.crosses(order.price, resting.price),
                None => false,
            };
            if !crosses {
                break;
            }
            let Some(fill) = self.side_mut(opposite).fill_best(order.qty) else {
                break;
            };
            order.qty -= fill.qty;
            fills.push(fill);
        }

        if order.qty > 0 {
            self.side_mut(order.side).insert(order.clone());
        }

        LimitOutcome { order, fills }
    }

    /// Consume resting liquidity until `qty` is filled or the opposite side is empty
    ///
    /// Any unfilled remainder is discarded; a market order never rests.
    pub fn submit_market(&mut self, side: Side, qty: Quantity) -> MarketOutcome {
        let opposite = side.opposite();
        let mut remaining = qty;
        let mut fills = Vec::new();

        while remaining > 0 {
            let Some(fill) = self.side_mut(opposite).fill_best(remaining) else {
                break;
            };
            remaining -= fill.qty;
            fills.push(fill);
        }

        MarketOutcome {
            requested: qty,
            fills,
        }
    }

    /// Remove a resting order by id
    ///
    /// Returns `None` if the order already filled, was cancelled or never existed.
    pub fn cancel(&mut self, order_id: OrderId) -> Option<LimitOrder> {
        self.side_mut(Side::Buy)
            .remove(order_id)
            .or_else(|| self.side_mut(Side::Sell).remove(order_id))
    }

    /// Remove every resting order created by `creator`, bids first
    pub fn cancel_all(&mut self, creator: Participant) -> Vec<LimitOrder> {
        let mut removed = self.side_mut(Side::Buy).remove_by_creator(creator);
        removed.extend(self.side_mut(Side::Sell).remove_by_creator(creator));
        removed
    }
}
