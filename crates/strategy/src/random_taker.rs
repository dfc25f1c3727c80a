//! Random market taker
//!
//! Noise trader: every tick, for each ticker of interest, buys with
//! probability `prob_buy`, sells with probability `prob_sell` and otherwise
//! does nothing.

use agora_core::{Quantity, Ticker};
use agora_exchange::Result as ExchangeResult;
use agora_runner::{Agent, AgentContext};
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomTakerConfig {
    #[serde(default = "default_prob")]
    pub prob_buy: f64,
    #[serde(default = "default_prob")]
    pub prob_sell: f64,
    #[serde(default = "default_qty")]
    pub qty_per_order: Quantity,
}

fn default_prob() -> f64 {
    0.2
}

fn default_qty() -> Quantity {
    1
}

impl Default for RandomTakerConfig {
    fn default() -> Self {
        Self {
            prob_buy: default_prob(),
            prob_sell: default_prob(),
            qty_per_order: default_qty(),
        }
    }
}

impl RandomTakerConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [("prob_buy", self.prob_buy), ("prob_sell", self.prob_sell)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(StrategyError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {p}"
                )));
            }
        }
        if self.prob_buy + self.prob_sell > 1.0 {
            return Err(StrategyError::InvalidConfig(format!(
                "prob_buy + prob_sell must not exceed 1, got {}",
                self.prob_buy + self.prob_sell
            )));
        }
        if self.qty_per_order == 0 {
            return Err(StrategyError::InvalidConfig(
                "qty_per_order must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// What a taker decided to do in one ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakerAction {
    Buy,
    Sell,
    Hold,
}

impl TakerAction {
    /// Map a uniform draw in `[0, 1)` onto buy / sell / hold bands
    pub fn from_draw(draw: f64, prob_buy: f64, prob_sell: f64) -> Self {
        if draw < prob_buy {
            TakerAction::Buy
        } else if draw < prob_buy + prob_sell {
            TakerAction::Sell
        } else {
            TakerAction::Hold
        }
    }

    /// Send the matching market order, if any
    pub fn execute(self, ctx: &mut AgentContext<'_>, ticker: &str, qty: Quantity) -> ExchangeResult<()> {
        match self {
            TakerAction::Buy => ctx.market_buy(ticker, qty).map(|_| ()),
            TakerAction::Sell => ctx.market_sell(ticker, qty).map(|_| ()),
            TakerAction::Hold => Ok(()),
        }
    }
}

pub struct RandomMarketTaker {
    config: RandomTakerConfig,
    rng: StdRng,
}

impl RandomMarketTaker {
    pub fn new(config: RandomTakerConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &RandomTakerConfig {
        &self.config
    }
}

impl Agent for RandomMarketTaker {
    fn next(&mut self, ctx: &mut AgentContext<'_>) -> ExchangeResult<()> {
        let tickers: Vec<Ticker> = ctx.tickers().to_vec();
        for ticker in &tickers {
            let draw: f64 = self.rng.gen_range(0.0..1.0);
            let action = TakerAction::from_draw(draw, self.config.prob_buy, self.config.prob_sell);
            trace!("{} {:?} {}", ctx.name(), action, ticker);
            action.execute(ctx, ticker, self.config.qty_per_order)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_probabilities() {
        let over = RandomTakerConfig {
            prob_buy: 0.6,
            prob_sell: 0.5,
            ..Default::default()
        };
        assert!(RandomMarketTaker::new(over, 1).is_err());

        let negative = RandomTakerConfig {
            prob_buy: -0.1,
            ..Default::default()
        };
        assert!(RandomMarketTaker::new(negative, 1).is_err());

        let zero_qty = RandomTakerConfig {
            qty_per_order: 0,
            ..Default::default()
        };
        assert!(RandomMarketTaker::new(zero_qty, 1).is_err());

        assert!(RandomMarketTaker::new(RandomTakerConfig::default(), 1).is_ok());
    }

    #[test]
    fn test_draw_bands() {
        assert_eq!(TakerAction::from_draw(0.1, 0.2, 0.3), TakerAction::Buy);
        assert_eq!(TakerAction::from_draw(0.2, 0.2, 0.3), TakerAction::Sell);
        assert_eq!(TakerAction::from_draw(0.49, 0.2, 0.3), TakerAction::Sell);
        assert_eq!(TakerAction::from_draw(0.5, 0.2, 0.3), TakerAction::Hold);
        assert_eq!(TakerAction::from_draw(0.0, 0.0, 0.0), TakerAction::Hold);
    }

    #[test]
    fn test_parse_config_defaults() {
        let config: RandomTakerConfig = serde_json::from_str(r#"{ "prob_buy": 0.4 }"#).unwrap();
        assert_eq!(config.prob_buy, 0.4);
        assert_eq!(config.prob_sell, 0.2);
        assert_eq!(config.qty_per_order, 1);
    }
}
