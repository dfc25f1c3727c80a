//! Agora Matching
//!
//! Per-asset order books and the price-time priority matching algorithm.
//!
//! Orders are matched based on:
//! 1. Best price (highest bid, lowest ask)
//! 2. Time priority (first in, first out at same price)
//!
//! Trades execute at the resting order's price. The book never holds an
//! order with zero remaining quantity.

mod book;
mod price_time;

pub use book::{BookSide, BookSnapshot, OrderBook};
pub use price_time::{Fill, LimitOutcome, MarketOutcome};
