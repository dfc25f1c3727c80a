//! Agent contract
//!
//! A strategy implements [`Agent::next`], called once per tick. Everything it
//! can do goes through the [`AgentContext`] it is handed: orders are stamped
//! with the agent's identity, and the account is only readable, so cash and
//! ledger stay under the simulator's control.

use agora_clock::Granularity;
use agora_core::{
    AgentId, Cash, LedgerEntry, LimitOrder, OrderId, Participant, Price, Quantity,
    SignedQuantity, Ticker, Timestamp, Trade,
};
use agora_exchange::{BookSnapshot, Exchange, MarketExecution, PriceBar, Quotes, Result};

use crate::account::{AgentAccount, CashPoint};

/// A trading strategy driven by the simulator
pub trait Agent {
    /// Act for the current tick
    ///
    /// Returning an error aborts the simulation run.
    fn next(&mut self, ctx: &mut AgentContext<'_>) -> Result<()>;
}

impl<F> Agent for F
where
    F: FnMut(&mut AgentContext<'_>) -> Result<()>,
{
    fn next(&mut self, ctx: &mut AgentContext<'_>) -> Result<()> {
        self(ctx)
    }
}

/// The agent's view of the world during one `next` call
pub struct AgentContext<'a> {
    account: &'a AgentAccount,
    exchange: &'a mut Exchange,
}

impl<'a> AgentContext<'a> {
    pub fn new(account: &'a AgentAccount, exchange: &'a mut Exchange) -> Self {
        Self { account, exchange }
    }

    fn me(&self) -> Participant {
        Participant::Agent(self.account.id())
    }

    // ------------------------------------------------------------------
    // Identity & account
    // ------------------------------------------------------------------

    pub fn id(&self) -> AgentId {
        self.account.id()
    }

    pub fn name(&self) -> &str {
        self.account.name()
    }

    pub fn tickers(&self) -> &[Ticker] {
        self.account.tickers()
    }

    /// Current simulation time
    pub fn now(&self) -> Timestamp {
        self.exchange.clock()
    }

    /// Cash as of the last settlement; trades made earlier in this tick are not reflected yet
    pub fn cash(&self) -> Cash {
        self.account.cash()
    }

    pub fn position(&self, ticker: &str) -> SignedQuantity {
        self.account.position(ticker)
    }

    pub fn cash_history(&self) -> Vec<CashPoint> {
        self.account.cash_history()
    }

    pub fn ledger(&self) -> &[LedgerEntry] {
        self.account.ledger()
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    pub fn market_buy(&mut self, ticker: &str, qty: Quantity) -> Result<MarketExecution> {
        let me = self.me();
        self.exchange.market_buy(ticker, qty, me)
    }

    pub fn market_sell(&mut self, ticker: &str, qty: Quantity) -> Result<MarketExecution> {
        let me = self.me();
        self.exchange.market_sell(ticker, qty, me)
    }

    pub fn limit_buy(&mut self, ticker: &str, price: Price, qty: Quantity) -> Result<LimitOrder> {
        let me = self.me();
        self.exchange.limit_buy(ticker, price, qty, me)
    }

    pub fn limit_sell(&mut self, ticker: &str, price: Price, qty: Quantity) -> Result<LimitOrder> {
        let me = self.me();
        self.exchange.limit_sell(ticker, price, qty, me)
    }

    /// Cancel one of this agent's resting orders
    ///
    /// `None` if the order is gone or belongs to someone else.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Option<LimitOrder> {
        let owned = self
            .exchange
            .find_order(order_id)
            .is_some_and(|order| order.creator == self.me());
        if !owned {
            return None;
        }
        self.exchange.cancel(order_id)
    }

    /// Cancel all of this agent's resting orders in one ticker
    pub fn cancel_all_orders(&mut self, ticker: &str) -> Result<Vec<LimitOrder>> {
        let me = self.me();
        self.exchange.cancel_all(ticker, me)
    }

    // ------------------------------------------------------------------
    // Market data
    // ------------------------------------------------------------------

    pub fn best_bid(&self, ticker: &str) -> Result<Option<&LimitOrder>> {
        self.exchange.best_bid(ticker)
    }

    pub fn best_ask(&self, ticker: &str) -> Result<Option<&LimitOrder>> {
        self.exchange.best_ask(ticker)
    }

    pub fn quotes(&self, ticker: &str) -> Result<Quotes> {
        self.exchange.quotes(ticker)
    }

    pub fn midprice(&self, ticker: &str) -> Result<Price> {
        self.exchange.midprice(ticker)
    }

    pub fn order_book(&self, ticker: &str) -> Result<BookSnapshot> {
        self.exchange.order_book(ticker)
    }

    pub fn trades(&self, ticker: &str) -> Result<Vec<&Trade>> {
        self.exchange.trades(ticker)
    }

    pub fn latest_trade(&self, ticker: &str) -> Result<Option<&Trade>> {
        self.exchange.latest_trade(ticker)
    }

    pub fn price_bars(&self, ticker: &str, bar_size: Granularity) -> Result<Vec<PriceBar>> {
        self.exchange.price_bars(ticker, bar_size)
    }

    /// Read-only access to the whole exchange
    pub fn exchange(&self) -> &Exchange {
        &*self.exchange
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_exchange::ExchangeConfig;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn setup() -> (AgentAccount, AgentAccount, Exchange) {
        let mut exchange = Exchange::new(
            ExchangeConfig::default(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        exchange.create_asset_default("X", dec!(100)).unwrap();
        let alice = AgentAccount::new(AgentId::new(0), "alice", vec!["X".into()], dec!(1000));
        let bob = AgentAccount::new(AgentId::new(1), "bob", vec!["X".into()], dec!(1000));
        (alice, bob, exchange)
    }

    #[test]
    fn test_orders_carry_agent_identity() {
        let (alice, _, mut exchange) = setup();
        let mut ctx = AgentContext::new(&alice, &mut exchange);

        let order = ctx.limit_buy("X", dec!(98), 2).unwrap();
        assert_eq!(order.creator, Participant::Agent(AgentId::new(0)));

        let exec = ctx.market_buy("X", 1).unwrap();
        assert_eq!(exec.filled, 1);
        assert_eq!(ctx.latest_trade("X").unwrap().unwrap().buyer, ctx.me());
        assert_eq!(ctx.name(), "alice");
        assert_eq!(ctx.tickers(), ["X".to_string()]);
    }

    #[test]
    fn test_cancel_order_only_own() {
        let (alice, bob, mut exchange) = setup();
        let order = {
            let mut ctx = AgentContext::new(&alice, &mut exchange);
            ctx.limit_sell("X", dec!(110), 1).unwrap()
        };

        let mut ctx = AgentContext::new(&bob, &mut exchange);
        assert!(ctx.cancel_order(order.id).is_none());
        assert!(ctx.exchange().find_order(order.id).is_some());

        let mut ctx = AgentContext::new(&alice, &mut exchange);
        assert_eq!(ctx.cancel_order(order.id).unwrap().id, order.id);
        assert!(ctx.cancel_order(order.id).is_none());
    }

    #[test]
    fn test_cash_unchanged_until_settlement() {
        let (alice, _, mut exchange) = setup();
        let mut ctx = AgentContext::new(&alice, &mut exchange);
        ctx.market_buy("X", 1).unwrap();

        assert_eq!(ctx.cash(), dec!(1000));
        assert_eq!(ctx.position("X"), 0);
    }

    #[test]
    fn test_closure_is_an_agent() {
        let (alice, _, mut exchange) = setup();
        let mut calls = 0;
        let mut agent = |ctx: &mut AgentContext<'_>| -> Result<()> {
            calls += 1;
            ctx.midprice("X").map(|_| ())
        };

        let mut ctx = AgentContext::new(&alice, &mut exchange);
        agent.next(&mut ctx).unwrap();
        agent.next(&mut ctx).unwrap();
        drop(agent);
        assert_eq!(calls, 2);
    }
}
