use agora_core::{LimitOrder, OrderId, Participant, Price, Quantity, Side, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::Fill;

/// One side of an order book
///
/// Price levels are kept in a `BTreeMap`, each level a FIFO queue.
/// Bids are read from the highest level down, asks from the lowest up.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Price, VecDeque<LimitOrder>>,
    /// Quick lookup for orders by ID
    index: HashMap<OrderId, Price>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    fn best_price(&self) -> Option<Price> {
        let entry = match self.side {
            Side::Buy => self.levels.last_key_value(),
            Side::Sell => self.levels.first_key_value(),
        };
        entry.map(|(price, _)| *price)
    }

    /// Head of the side: best price, earliest arrival
    pub fn best(&self) -> Option<&LimitOrder> {
        let price = self.best_price()?;
        self.levels.get(&price).and_then(|queue| queue.front())
    }

    /// Resting orders in priority order
    pub fn iter(&self) -> impl Iterator<Item = &LimitOrder> + '_ {
        let levels: Box<dyn Iterator<Item = &VecDeque<LimitOrder>> + '_> = match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        };
        levels.flat_map(|queue| queue.iter())
    }

    /// Number of resting orders
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of distinct price levels
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Total resting quantity across all levels
    pub fn total_qty(&self) -> Quantity {
        self.levels
            .values()
            .flat_map(|queue| queue.iter())
            .map(|order| order.qty)
            .sum()
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    pub fn get(&self, order_id: OrderId) -> Option<&LimitOrder> {
        let price = self.index.get(&order_id)?;
        self.levels.get(price)?.iter().find(|o| o.id == order_id)
    }

    /// Append an order at the back of its price level
    ///
    /// All equal-or-better priced orders stay ahead of it.
    pub(crate) fn insert(&mut self, order: LimitOrder) {
        debug_assert!(order.qty > 0, "zero quantity order must not rest");
        debug_assert_eq!(order.side, self.side);
        self.index.insert(order.id, order.price);
        self.levels.entry(order.price).or_default().push_back(order);
    }

    /// Remove an order from the side
    pub(crate) fn remove(&mut self, order_id: OrderId) -> Option<LimitOrder> {
        let price = self.index.remove(&order_id)?;
        let queue = self.levels.get_mut(&price)?;
        let pos = queue.iter().position(|o| o.id == order_id)?;
        let order = queue.remove(pos)?;
        if queue.is_empty() {
            self.levels.remove(&price);
        }
        Some(order)
    }

    /// Remove every order created by `creator`, returned in priority order
    pub(crate) fn remove_by_creator(&mut self, creator: Participant) -> Vec<LimitOrder> {
        let ids: Vec<OrderId> = self
            .iter()
            .filter(|o| o.creator == creator)
            .map(|o| o.id)
            .collect();
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Trade up to `max_qty` against the head order
    ///
    /// The head is popped in the same step if it is exhausted, and an emptied
    /// level is dropped, so no zero-quantity order is ever observable.
    pub(crate) fn fill_best(&mut self, max_qty: Quantity) -> Option<Fill> {
        if max_qty == 0 {
            return None;
        }

        let price = self.best_price()?;
        let queue = self.levels.get_mut(&price)?;
        let head = queue.front_mut()?;

        let qty = max_qty.min(head.qty);
        head.qty -= qty;
        let fill = Fill {
            maker_order_id: head.id,
            maker: head.creator,
            price,
            qty,
        };
        let exhausted = head.qty == 0;

        if exhausted {
            if let Some(done) = queue.pop_front() {
                self.index.remove(&done.id);
            }
        }
        if queue.is_empty() {
            self.levels.remove(&price);
        }

        Some(fill)
    }
}

/// Order book for a single ticker
///
/// Owned exclusively by the exchange; nothing else mutates it.
#[derive(Debug, Clone)]
pub struct OrderBook {
    ticker: Ticker,
    bids: BookSide,
    asks: BookSide,
}

impl OrderBook {
    pub fn new(ticker: impl Into<Ticker>) -> Self {
        Self {
            ticker: ticker.into(),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Best bid (highest buy order)
    pub fn best_bid(&self) -> Option<&LimitOrder> {
        self.bids.best()
    }

    /// Best ask (lowest sell order)
    pub fn best_ask(&self) -> Option<&LimitOrder> {
        self.asks.best()
    }

    pub fn get(&self, order_id: OrderId) -> Option<&LimitOrder> {
        self.bids.get(order_id).or_else(|| self.asks.get(order_id))
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.bids.contains(order_id) || self.asks.contains(order_id)
    }

    /// Ordered copy of the resting orders
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            ticker: self.ticker.clone(),
            bids: self.bids.iter().cloned().collect(),
            asks: self.asks.iter().cloned().collect(),
        }
    }
}

/// Read-only copy of a book, bids and asks each in priority order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub ticker: Ticker,
    pub bids: Vec<LimitOrder>,
    pub asks: Vec<LimitOrder>,
}
