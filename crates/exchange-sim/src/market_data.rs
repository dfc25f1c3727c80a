//! Read-side projections over books and the trade log
//!
//! Bars are aligned to the epoch (a daily bar starts at midnight UTC).
//! Buckets without trades between the first and last traded bucket are
//! backfilled with a flat bar at the previous close and zero volume.

use agora_clock::Granularity;
use agora_core::{Price, Quantity, Ticker, Timestamp, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top of book on both sides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotes {
    pub ticker: Ticker,
    pub bid_qty: Quantity,
    pub bid_price: Price,
    pub ask_qty: Quantity,
    pub ask_price: Price,
}

impl Quotes {
    pub fn spread(&self) -> Price {
        self.ask_price - self.bid_price
    }

    pub fn midprice(&self) -> Price {
        (self.bid_price + self.ask_price) / Decimal::TWO
    }
}

/// OHLCV bar for one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bucket start
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
    pub trade_count: usize,
}

impl PriceBar {
    fn new(timestamp: Timestamp, trade: &Trade) -> Self {
        Self {
            timestamp,
            open: trade.price,
            high: trade.price,
            low: trade.price,
            close: trade.price,
            volume: trade.qty,
            trade_count: 1,
        }
    }

    fn flat(timestamp: Timestamp, prev_close: Price) -> Self {
        Self {
            timestamp,
            open: prev_close,
            high: prev_close,
            low: prev_close,
            close: prev_close,
            volume: 0,
            trade_count: 0,
        }
    }

    fn update(&mut self, trade: &Trade) {
        self.high = self.high.max(trade.price);
        self.low = self.low.min(trade.price);
        self.close = trade.price;
        self.volume += trade.qty;
        self.trade_count += 1;
    }

    /// Whether the bar saw any trades
    pub fn is_flat(&self) -> bool {
        self.trade_count == 0
    }
}

/// Aggregate trades, given in log order, into consecutive bars
///
/// Open and close follow log order within a bucket, so a caller-supplied
/// clock that moves backwards never reorders a bucket's trades.
pub fn aggregate_bars<'a>(
    trades: impl IntoIterator<Item = &'a Trade>,
    bar_size: Granularity,
) -> Vec<PriceBar> {
    let mut buckets: BTreeMap<Timestamp, PriceBar> = BTreeMap::new();
    for trade in trades {
        let start = bar_size.bucket_start(trade.timestamp);
        buckets
            .entry(start)
            .and_modify(|bar| bar.update(trade))
            .or_insert_with(|| PriceBar::new(start, trade));
    }

    let step = bar_size.step();
    let mut bars: Vec<PriceBar> = Vec::with_capacity(buckets.len());
    for (start, bar) in buckets {
        if let Some(prev) = bars.last() {
            let close = prev.close;
            let mut gap = prev.timestamp + step;
            while gap < start {
                bars.push(PriceBar::flat(gap, close));
                gap += step;
            }
        }
        bars.push(bar);
    }
    bars
}
