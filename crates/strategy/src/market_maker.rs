//! Naive market maker
//!
//! Each tick, per ticker: pull all own quotes, then quote one bid and one ask
//! symmetrically around the last traded price.

use agora_core::{Price, Quantity, Ticker};
use agora_exchange::Result as ExchangeResult;
use agora_runner::{Agent, AgentContext};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketMakerConfig {
    /// Full quoted spread as a fraction of the last price (0.005 = 50 bps)
    #[serde(default = "default_spread_pct")]
    pub spread_pct: Decimal,
    #[serde(default = "default_qty")]
    pub qty_per_order: Quantity,
}

fn default_spread_pct() -> Decimal {
    Decimal::new(5, 3)
}

fn default_qty() -> Quantity {
    1
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            spread_pct: default_spread_pct(),
            qty_per_order: default_qty(),
        }
    }
}

pub struct NaiveMarketMaker {
    config: MarketMakerConfig,
}

impl NaiveMarketMaker {
    pub fn new(config: MarketMakerConfig) -> Result<Self> {
        // bid = last * (1 - spread/2) has to stay positive
        if config.spread_pct < Decimal::ZERO || config.spread_pct >= Decimal::TWO {
            return Err(StrategyError::InvalidConfig(format!(
                "spread_pct must be in [0, 2), got {}",
                config.spread_pct
            )));
        }
        if config.qty_per_order == 0 {
            return Err(StrategyError::InvalidConfig(
                "qty_per_order must be positive".into(),
            ));
        }
        Ok(Self { config })
    }

    /// Bid and ask around `last`
    pub fn quote(&self, last: Price) -> (Price, Price) {
        let half = self.config.spread_pct / Decimal::TWO;
        (last * (Decimal::ONE - half), last * (Decimal::ONE + half))
    }
}

impl Agent for NaiveMarketMaker {
    fn next(&mut self, ctx: &mut AgentContext<'_>) -> ExchangeResult<()> {
        let tickers: Vec<Ticker> = ctx.tickers().to_vec();
        for ticker in &tickers {
            let Some(last) = ctx.latest_trade(ticker)?.map(|t| t.price) else {
                continue;
            };
            ctx.cancel_all_orders(ticker)?;

            let (bid, ask) = self.quote(last);
            let qty = self.config.qty_per_order;
            ctx.limit_buy(ticker, bid, qty)?;
            ctx.limit_sell(ticker, ask, qty)?;
            debug!("{} quoting {} {} / {} x{}", ctx.name(), ticker, bid, ask, qty);
        }
        Ok(())
    }
}
