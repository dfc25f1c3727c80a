use agora_clock::Granularity;
use agora_core::{
    LimitOrder, MAX_QUANTITY, OrderId, Participant, Price, Quantity, Settlement, Side, Ticker,
    Timestamp, Trade,
};
use agora_matching::{BookSnapshot, Fill, OrderBook};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ExchangeConfig;
use crate::error::{ExchangeError, Result};
use crate::market_data::{PriceBar, Quotes, aggregate_bars};

/// What a market order actually executed
///
/// A market order never errors on thin liquidity; compare `filled` with
/// `requested` to detect a shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketExecution {
    pub side: Side,
    pub requested: Quantity,
    pub filled: Quantity,
    /// Sum of qty * price over all fills
    pub notional: Decimal,
}

impl MarketExecution {
    pub fn is_complete(&self) -> bool {
        self.filled == self.requested
    }

    pub fn shortfall(&self) -> Quantity {
        self.requested - self.filled
    }

    /// Volume-weighted fill price, `None` if nothing traded
    pub fn average_price(&self) -> Option<Price> {
        if self.filled == 0 {
            return None;
        }
        Some(self.notional / Decimal::from(self.filled))
    }
}

/// The synthetic exchange
///
/// Sole owner and mutator of every order book and of the trade log. Each
/// trade pushes its two settlement legs onto a pending queue which the
/// simulator drains once per tick; the exchange never touches balances.
#[derive(Debug)]
pub struct Exchange {
    config: ExchangeConfig,
    books: BTreeMap<Ticker, OrderBook>,
    trade_log: Vec<Trade>,
    clock: Timestamp,
    pending: Vec<Settlement>,
}

impl Exchange {
    pub fn new(config: ExchangeConfig, clock: Timestamp) -> Self {
        Self {
            config,
            books: BTreeMap::new(),
            trade_log: Vec::new(),
            clock,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Current simulation time, stamped on every new order and trade
    pub fn clock(&self) -> Timestamp {
        self.clock
    }

    pub fn set_clock(&mut self, now: Timestamp) {
        self.clock = now;
    }

    /// Listed tickers in lexical order
    pub fn tickers(&self) -> impl Iterator<Item = &str> + '_ {
        self.books.keys().map(String::as_str)
    }

    pub fn has_asset(&self, ticker: &str) -> bool {
        self.books.contains_key(ticker)
    }

    // ------------------------------------------------------------------
    // Asset listing
    // ------------------------------------------------------------------

    /// List a new asset with a seed trade and a thin two-sided market
    ///
    /// The seed trade prints at `seed_price`; one seed bid rests at
    /// `seed_price * (1 - seed_bid_pct)` and one seed ask at
    /// `seed_price * (1 + seed_ask_pct)`, all created by [`Participant::Seed`].
    pub fn create_asset(
        &mut self,
        ticker: impl Into<Ticker>,
        seed_price: Price,
        seed_bid_pct: Decimal,
        seed_ask_pct: Decimal,
    ) -> Result<()> {
        let ticker = ticker.into();
        if self.books.contains_key(&ticker) {
            return Err(ExchangeError::DuplicateTicker(ticker));
        }
        let seed_price = self.round_price(seed_price);
        if seed_price <= Decimal::ZERO {
            return Err(ExchangeError::InvalidSeed(format!(
                "seed price must be positive, got {seed_price}"
            )));
        }
        for pct in [seed_bid_pct, seed_ask_pct] {
            if pct < Decimal::ZERO || pct >= Decimal::ONE {
                return Err(ExchangeError::InvalidSeed(format!(
                    "seed spread must be in [0, 1), got {pct}"
                )));
            }
        }
        let qty = self.config.seed_qty;
        if qty == 0 || qty > MAX_QUANTITY {
            return Err(ExchangeError::InvalidSeed(format!(
                "seed quantity must be in 1..={MAX_QUANTITY}, got {qty}"
            )));
        }
        // the seed ask would otherwise trade against the seed bid
        let bid = self.round_price(seed_price * (Decimal::ONE - seed_bid_pct));
        let ask = self.round_price(seed_price * (Decimal::ONE + seed_ask_pct));
        if bid >= ask {
            return Err(ExchangeError::InvalidSeed(format!(
                "seed bid {bid} must be below seed ask {ask}"
            )));
        }

        info!(
            "Listing {} at {} (bid -{}, ask +{})",
            ticker, seed_price, seed_bid_pct, seed_ask_pct
        );
        self.books.insert(ticker.clone(), OrderBook::new(ticker.clone()));

        let seed_trade = Trade::new(
            ticker.clone(),
            qty,
            seed_price,
            Participant::Seed,
            Participant::Seed,
            self.clock,
        );
        self.record_trade(seed_trade);

        self.limit_buy(&ticker, bid, qty, Participant::Seed)?;
        self.limit_sell(&ticker, ask, qty, Participant::Seed)?;
        Ok(())
    }

    /// [`create_asset`](Self::create_asset) with the configured seed spread
    pub fn create_asset_default(&mut self, ticker: impl Into<Ticker>, seed_price: Price) -> Result<()> {
        let (bid_pct, ask_pct) = (self.config.seed_bid_pct, self.config.seed_ask_pct);
        self.create_asset(ticker, seed_price, bid_pct, ask_pct)
    }

    // ------------------------------------------------------------------
    // Order entry
    // ------------------------------------------------------------------

    pub fn limit_buy(
        &mut self,
        ticker: &str,
        price: Price,
        qty: Quantity,
        creator: Participant,
    ) -> Result<LimitOrder> {
        self.submit_limit(ticker, Side::Buy, price, qty, creator)
    }

    pub fn limit_sell(
        &mut self,
        ticker: &str,
        price: Price,
        qty: Quantity,
        creator: Participant,
    ) -> Result<LimitOrder> {
        self.submit_limit(ticker, Side::Sell, price, qty, creator)
    }

    /// Submit a limit order, matching it first and resting any remainder
    ///
    /// The price is rounded to `price_scale` digits before anything else.
    /// The returned order carries the unfilled remainder (zero when fully filled).
    pub fn submit_limit(
        &mut self,
        ticker: &str,
        side: Side,
        price: Price,
        qty: Quantity,
        creator: Participant,
    ) -> Result<LimitOrder> {
        let price = self.round_price(price);
        if price < Decimal::ZERO {
            return Err(ExchangeError::InvalidPrice(price));
        }
        if qty == 0 || qty > MAX_QUANTITY {
            return Err(ExchangeError::InvalidQuantity(qty));
        }

        let order = LimitOrder::new(ticker, side, price, qty, creator, self.clock);
        let outcome = self.book_mut(ticker)?.submit_limit(order);
        self.record_fills(ticker, side, creator, &outcome.fills);

        if outcome.rested() {
            debug!("Resting {} from {}", outcome.order, creator);
        }
        Ok(outcome.order)
    }

    pub fn market_buy(
        &mut self,
        ticker: &str,
        qty: Quantity,
        taker: Participant,
    ) -> Result<MarketExecution> {
        self.submit_market(ticker, Side::Buy, qty, taker)
    }

    pub fn market_sell(
        &mut self,
        ticker: &str,
        qty: Quantity,
        taker: Participant,
    ) -> Result<MarketExecution> {
        self.submit_market(ticker, Side::Sell, qty, taker)
    }

    /// Walk the opposite side until `qty` is filled or liquidity runs out
    ///
    /// An unfilled remainder is dropped, never rested.
    pub fn submit_market(
        &mut self,
        ticker: &str,
        side: Side,
        qty: Quantity,
        taker: Participant,
    ) -> Result<MarketExecution> {
        if qty == 0 || qty > MAX_QUANTITY {
            return Err(ExchangeError::InvalidQuantity(qty));
        }

        let outcome = self.book_mut(ticker)?.submit_market(side, qty);
        self.record_fills(ticker, side, taker, &outcome.fills);

        let execution = MarketExecution {
            side,
            requested: qty,
            filled: outcome.filled(),
            notional: outcome.notional(),
        };
        if !execution.is_complete() {
            warn!(
                "Market {} {} {} from {} filled {} of {}",
                side, qty, ticker, taker, execution.filled, qty
            );
        }
        Ok(execution)
    }

    /// Cancel a resting order in any book
    ///
    /// Returns `None` if it already filled, was cancelled or never existed.
    pub fn cancel(&mut self, order_id: OrderId) -> Option<LimitOrder> {
        let cancelled = self.books.values_mut().find_map(|book| book.cancel(order_id));
        if let Some(order) = &cancelled {
            debug!("Cancelled {}", order);
        }
        cancelled
    }

    /// Cancel every resting order of `creator` in one book
    pub fn cancel_all(&mut self, ticker: &str, creator: Participant) -> Result<Vec<LimitOrder>> {
        let cancelled = self.book_mut(ticker)?.cancel_all(creator);
        if !cancelled.is_empty() {
            debug!(
                "Cancelled {} orders of {} in {}",
                cancelled.len(),
                creator,
                ticker
            );
        }
        Ok(cancelled)
    }

    // ------------------------------------------------------------------
    // Market data
    // ------------------------------------------------------------------

    pub fn find_order(&self, order_id: OrderId) -> Option<&LimitOrder> {
        self.books.values().find_map(|book| book.get(order_id))
    }

    pub fn best_bid(&self, ticker: &str) -> Result<Option<&LimitOrder>> {
        Ok(self.book(ticker)?.best_bid())
    }

    pub fn best_ask(&self, ticker: &str) -> Result<Option<&LimitOrder>> {
        Ok(self.book(ticker)?.best_ask())
    }

    /// Top of book on both sides; fails with [`ExchangeError::EmptyBook`] if either is empty
    pub fn quotes(&self, ticker: &str) -> Result<Quotes> {
        let book = self.book(ticker)?;
        let empty = |side| ExchangeError::EmptyBook {
            ticker: ticker.to_string(),
            side,
        };
        let bid = book.best_bid().ok_or_else(|| empty(Side::Buy))?;
        let ask = book.best_ask().ok_or_else(|| empty(Side::Sell))?;
        Ok(Quotes {
            ticker: ticker.to_string(),
            bid_qty: bid.qty,
            bid_price: bid.price,
            ask_qty: ask.qty,
            ask_price: ask.price,
        })
    }

    pub fn midprice(&self, ticker: &str) -> Result<Price> {
        Ok(self.quotes(ticker)?.midprice())
    }

    pub fn order_book(&self, ticker: &str) -> Result<BookSnapshot> {
        Ok(self.book(ticker)?.snapshot())
    }

    /// Direct read access to a book
    pub fn book(&self, ticker: &str) -> Result<&OrderBook> {
        self.books
            .get(ticker)
            .ok_or_else(|| ExchangeError::UnknownTicker(ticker.to_string()))
    }

    /// Trades of one ticker in log order
    pub fn trades(&self, ticker: &str) -> Result<Vec<&Trade>> {
        self.book(ticker)?;
        Ok(self.trade_log.iter().filter(|t| t.ticker == ticker).collect())
    }

    pub fn latest_trade(&self, ticker: &str) -> Result<Option<&Trade>> {
        self.book(ticker)?;
        Ok(self.trade_log.iter().rev().find(|t| t.ticker == ticker))
    }

    /// Every trade on the exchange in occurrence order
    pub fn trade_log(&self) -> &[Trade] {
        &self.trade_log
    }

    pub fn price_bars(&self, ticker: &str, bar_size: Granularity) -> Result<Vec<PriceBar>> {
        Ok(aggregate_bars(self.trades(ticker)?, bar_size))
    }

    // ------------------------------------------------------------------
    // Settlement queue
    // ------------------------------------------------------------------

    pub fn pending_settlements(&self) -> &[Settlement] {
        &self.pending
    }

    /// Hand over every queued settlement, leaving the queue empty
    pub fn drain_settlements(&mut self) -> Vec<Settlement> {
        std::mem::take(&mut self.pending)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn book_mut(&mut self, ticker: &str) -> Result<&mut OrderBook> {
        self.books
            .get_mut(ticker)
            .ok_or_else(|| ExchangeError::UnknownTicker(ticker.to_string()))
    }

    fn round_price(&self, price: Price) -> Price {
        price.round_dp(self.config.price_scale)
    }

    fn record_fills(&mut self, ticker: &str, side: Side, aggressor: Participant, fills: &[Fill]) {
        for fill in fills {
            let (buyer, seller) = match side {
                Side::Buy => (aggressor, fill.maker),
                Side::Sell => (fill.maker, aggressor),
            };
            let trade = Trade::new(ticker, fill.qty, fill.price, buyer, seller, self.clock);
            self.record_trade(trade);
        }
    }

    fn record_trade(&mut self, trade: Trade) {
        debug!("{} buyer={} seller={}", trade, trade.buyer, trade.seller);
        self.pending.extend(Settlement::legs(&trade));
        self.trade_log.push(trade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::AgentId;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn agent(n: u32) -> Participant {
        Participant::Agent(AgentId::new(n))
    }

    fn exchange() -> Exchange {
        Exchange::new(
            ExchangeConfig::default(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    /// An exchange with an empty "X" book (seed orders cancelled)
    fn bare_exchange() -> Exchange {
        let mut ex = exchange();
        ex.create_asset_default("X", dec!(100)).unwrap();
        ex.cancel_all("X", Participant::Seed).unwrap();
        ex.drain_settlements();
        ex
    }

    #[test]
    fn test_create_asset_seeds_market() {
        let mut ex = exchange();
        ex.create_asset_default("X", dec!(100)).unwrap();

        assert_eq!(ex.best_bid("X").unwrap().unwrap().price, dec!(99));
        assert_eq!(ex.best_ask("X").unwrap().unwrap().price, dec!(101));
        assert_eq!(ex.midprice("X").unwrap(), dec!(100));

        let trades = ex.trades("X").unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, dec!(100));
        assert!(trades[0].buyer.is_seed());
        assert_eq!(ex.pending_settlements().len(), 2);
    }

    #[test]
    fn test_create_asset_twice_fails() {
        let mut ex = exchange();
        ex.create_asset_default("X", dec!(100)).unwrap();
        let err = ex.create_asset_default("X", dec!(50)).unwrap_err();
        assert_eq!(err, ExchangeError::DuplicateTicker("X".into()));
    }

    #[test]
    fn test_create_asset_rejects_bad_seed() {
        let mut ex = exchange();
        assert!(matches!(
            ex.create_asset_default("X", dec!(0)),
            Err(ExchangeError::InvalidSeed(_))
        ));
        assert!(matches!(
            ex.create_asset("Y", dec!(10), dec!(1.5), dec!(0.01)),
            Err(ExchangeError::InvalidSeed(_))
        ));
        assert!(!ex.has_asset("X"));
        assert!(!ex.has_asset("Y"));
    }

    #[test]
    fn test_create_asset_rejects_crossed_seed() {
        let mut ex = exchange();
        // both seed prices round to 1.00
        assert!(matches!(
            ex.create_asset("X", dec!(1), dec!(0.001), dec!(0.001)),
            Err(ExchangeError::InvalidSeed(_))
        ));
        assert!(matches!(
            ex.create_asset("Z", dec!(100), dec!(0), dec!(0)),
            Err(ExchangeError::InvalidSeed(_))
        ));
        assert!(!ex.has_asset("X"));
        assert!(!ex.has_asset("Z"));
        assert!(ex.trade_log().is_empty());
        assert!(ex.pending_settlements().is_empty());

        // a one-sided zero spread still leaves a two-sided market
        ex.create_asset("Y", dec!(1), dec!(0), dec!(0.01)).unwrap();
        let quotes = ex.quotes("Y").unwrap();
        assert_eq!(quotes.bid_price, dec!(1));
        assert_eq!(quotes.ask_price, dec!(1.01));
    }

    #[test]
    fn test_quantity_above_signed_range_rejected() {
        let mut ex = bare_exchange();
        let huge = MAX_QUANTITY + 1;
        assert_eq!(
            ex.limit_sell("X", dec!(0), huge, agent(0)).unwrap_err(),
            ExchangeError::InvalidQuantity(huge)
        );
        assert_eq!(
            ex.market_buy("X", huge, agent(1)).unwrap_err(),
            ExchangeError::InvalidQuantity(huge)
        );

        ex.limit_sell("X", dec!(0), MAX_QUANTITY, agent(0)).unwrap();
        let exec = ex.market_buy("X", MAX_QUANTITY, agent(1)).unwrap();
        assert!(exec.is_complete());
        let legs = ex.drain_settlements();
        assert_eq!(legs[0].qty, i64::MAX);
        assert_eq!(legs[1].qty, -i64::MAX);
    }

    #[test]
    fn test_unknown_ticker() {
        let mut ex = exchange();
        assert_eq!(
            ex.best_bid("NOPE").unwrap_err(),
            ExchangeError::UnknownTicker("NOPE".into())
        );
        assert!(ex.limit_buy("NOPE", dec!(1), 1, agent(0)).is_err());
        assert!(ex.trades("NOPE").is_err());
    }

    #[test]
    fn test_prices_rounded_at_submission() {
        let mut ex = bare_exchange();
        let order = ex.limit_buy("X", dec!(99.996), 1, agent(0)).unwrap();
        assert_eq!(order.price, dec!(100.00));
        assert_eq!(ex.best_bid("X").unwrap().unwrap().price, dec!(100));
    }

    #[test]
    fn test_invalid_submissions() {
        let mut ex = bare_exchange();
        assert_eq!(
            ex.limit_sell("X", dec!(-1), 1, agent(0)).unwrap_err(),
            ExchangeError::InvalidPrice(dec!(-1))
        );
        assert_eq!(
            ex.limit_sell("X", dec!(10), 0, agent(0)).unwrap_err(),
            ExchangeError::InvalidQuantity(0)
        );
        assert_eq!(
            ex.market_buy("X", 0, agent(0)).unwrap_err(),
            ExchangeError::InvalidQuantity(0)
        );
    }

    #[test]
    fn test_trade_queues_offsetting_legs() {
        let mut ex = bare_exchange();
        ex.limit_sell("X", dec!(100), 3, agent(0)).unwrap();
        let exec = ex.market_buy("X", 2, agent(1)).unwrap();
        assert!(exec.is_complete());
        assert_eq!(exec.average_price(), Some(dec!(100)));

        let legs = ex.drain_settlements();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].participant, agent(1));
        assert_eq!(legs[0].cash_flow, dec!(-200));
        assert_eq!(legs[0].qty, 2);
        assert_eq!(legs[1].participant, agent(0));
        assert_eq!(legs[1].cash_flow, dec!(200));
        assert_eq!(legs[1].qty, -2);

        assert!(ex.drain_settlements().is_empty());
    }

    #[test]
    fn test_quotes_on_empty_side_fail() {
        let mut ex = bare_exchange();
        ex.limit_buy("X", dec!(99), 1, agent(0)).unwrap();

        assert_eq!(
            ex.quotes("X").unwrap_err(),
            ExchangeError::EmptyBook {
                ticker: "X".into(),
                side: Side::Sell
            }
        );
        assert!(ex.midprice("X").is_err());
        assert!(ex.best_ask("X").unwrap().is_none());
    }

    #[test]
    fn test_cancel_scans_all_books() {
        let mut ex = bare_exchange();
        ex.create_asset_default("Y", dec!(10)).unwrap();
        let order = ex.limit_sell("Y", dec!(20), 1, agent(0)).unwrap();

        assert_eq!(ex.find_order(order.id).unwrap().ticker, "Y");
        assert_eq!(ex.cancel(order.id).unwrap().id, order.id);
        assert!(ex.find_order(order.id).is_none());
        assert!(ex.cancel(order.id).is_none());
    }

    #[test]
    fn test_latest_trade_and_clock() {
        let mut ex = bare_exchange();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        ex.set_clock(later);
        ex.limit_sell("X", dec!(105), 1, agent(0)).unwrap();
        ex.limit_buy("X", dec!(106), 1, agent(1)).unwrap();

        let last = ex.latest_trade("X").unwrap().unwrap();
        assert_eq!(last.price, dec!(105));
        assert_eq!(last.timestamp, later);
        assert_eq!(last.buyer, agent(1));
        assert_eq!(last.seller, agent(0));

        let bars = ex.price_bars("X", Granularity::Day).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, dec!(100));
        assert_eq!(bars[1].close, dec!(105));
    }
}
