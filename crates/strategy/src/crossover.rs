//! Moving-average crossover signal and the taker it drives
//!
//! The signal keeps a bounded price history and emits buy/sell/hold weights.
//! Only a fresh cross changes the weights: short MA moving above the long
//! MA favours buying, moving below favours selling. Any other tick, including
//! one where an earlier cross still holds, returns the neutral weights.

use agora_core::{Price, Quantity, Ticker};
use agora_exchange::Result as ExchangeResult;
use agora_runner::{Agent, AgentContext};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::error::{Result, StrategyError};
use crate::random_taker::TakerAction;

/// Probabilities of buying, selling or holding on one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub buy: f64,
    pub sell: f64,
    pub hold: f64,
}

impl Weights {
    pub const NEUTRAL: Weights = Weights {
        buy: 0.0,
        sell: 0.0,
        hold: 1.0,
    };
    pub const BULLISH: Weights = Weights {
        buy: 0.9,
        sell: 0.05,
        hold: 0.05,
    };
    pub const BEARISH: Weights = Weights {
        buy: 0.05,
        sell: 0.9,
        hold: 0.05,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverConfig {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 20,
        }
    }
}

impl CrossoverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.short_window == 0 || self.short_window >= self.long_window {
            return Err(StrategyError::InvalidConfig(format!(
                "need 0 < short_window < long_window, got {} and {}",
                self.short_window, self.long_window
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MovingAverageCrossover {
    config: CrossoverConfig,
    /// Last `long_window + 1` prices, enough for the current and previous MAs
    history: VecDeque<Price>,
}

impl MovingAverageCrossover {
    pub fn new(config: CrossoverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            history: VecDeque::with_capacity(config.long_window + 1),
        })
    }

    /// Mean of the `window` prices ending `lag` observations before the latest
    fn mean(&self, window: usize, lag: usize) -> Decimal {
        let end = self.history.len() - lag;
        let start = end.saturating_sub(window);
        let sum: Decimal = self.history.range(start..end).copied().sum();
        sum / Decimal::from(end - start)
    }

    /// Record a new price and return the weights for this tick
    pub fn evaluate(&mut self, price: Price) -> Weights {
        if self.history.len() == self.config.long_window + 1 {
            self.history.pop_front();
        }
        self.history.push_back(price);

        if self.history.len() < self.config.long_window {
            return Weights::NEUTRAL;
        }

        let (short, long) = (self.config.short_window, self.config.long_window);
        let short_now = self.mean(short, 0);
        let long_now = self.mean(long, 0);
        let short_prev = self.mean(short, 1);
        let long_prev = self.mean(long, 1);

        if short_now > long_now && short_prev <= long_prev {
            Weights::BULLISH
        } else if short_now < long_now && short_prev >= long_prev {
            Weights::BEARISH
        } else {
            Weights::NEUTRAL
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverTakerConfig {
    #[serde(flatten)]
    pub signal: CrossoverConfig,
    #[serde(default = "default_qty")]
    pub qty_per_order: Quantity,
}

fn default_qty() -> Quantity {
    1
}

impl Default for CrossoverTakerConfig {
    fn default() -> Self {
        Self {
            signal: CrossoverConfig::default(),
            qty_per_order: default_qty(),
        }
    }
}

/// Market taker whose buy/sell odds come from a crossover signal per ticker
///
/// The signal is fed the last traded price once per tick.
pub struct CrossoverTaker {
    config: CrossoverTakerConfig,
    signals: HashMap<Ticker, MovingAverageCrossover>,
    rng: StdRng,
}

impl CrossoverTaker {
    pub fn new(config: CrossoverTakerConfig, seed: u64) -> Result<Self> {
        config.signal.validate()?;
        if config.qty_per_order == 0 {
            return Err(StrategyError::InvalidConfig(
                "qty_per_order must be positive".into(),
            ));
        }
        Ok(Self {
            config,
            signals: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn signal(&mut self, ticker: &str) -> &mut MovingAverageCrossover {
        let config = self.config.signal;
        self.signals
            .entry(ticker.to_string())
            .or_insert_with(|| MovingAverageCrossover {
                config,
                history: VecDeque::with_capacity(config.long_window + 1),
            })
    }
}

impl Agent for CrossoverTaker {
    fn next(&mut self, ctx: &mut AgentContext<'_>) -> ExchangeResult<()> {
        let tickers: Vec<Ticker> = ctx.tickers().to_vec();
        for ticker in &tickers {
            let Some(last) = ctx.latest_trade(ticker)?.map(|t| t.price) else {
                continue;
            };
            let weights = self.signal(ticker).evaluate(last);
            if weights != Weights::NEUTRAL {
                debug!("{} crossover on {}: {:?}", ctx.name(), ticker, weights);
            }

            let draw: f64 = self.rng.gen_range(0.0..1.0);
            let action = TakerAction::from_draw(draw, weights.buy, weights.sell);
            action.execute(ctx, ticker, self.config.qty_per_order)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn signal(short: usize, long: usize) -> MovingAverageCrossover {
        MovingAverageCrossover::new(CrossoverConfig {
            short_window: short,
            long_window: long,
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_windows() {
        for (short, long) in [(0, 5), (5, 5), (6, 5)] {
            let config = CrossoverConfig {
                short_window: short,
                long_window: long,
            };
            assert!(MovingAverageCrossover::new(config).is_err());
        }
    }

    #[test]
    fn test_neutral_until_long_window_filled() {
        let mut s = signal(2, 4);
        for p in [dec!(10), dec!(11), dec!(12)] {
            assert_eq!(s.evaluate(p), Weights::NEUTRAL);
        }
    }

    #[test]
    fn test_fresh_upward_cross_is_bullish_once() {
        let mut s = signal(2, 4);
        for p in [dec!(10), dec!(10), dec!(10)] {
            s.evaluate(p);
        }
        // flat: short == long, no cross
        assert_eq!(s.evaluate(dec!(10)), Weights::NEUTRAL);
        // short jumps above long
        assert_eq!(s.evaluate(dec!(14)), Weights::BULLISH);
        // still above: not a fresh cross
        assert_eq!(s.evaluate(dec!(15)), Weights::NEUTRAL);
    }

    #[test]
    fn test_fresh_downward_cross_is_bearish() {
        let mut s = signal(2, 4);
        for p in [dec!(10), dec!(10), dec!(10), dec!(10)] {
            s.evaluate(p);
        }
        assert_eq!(s.evaluate(dec!(6)), Weights::BEARISH);
        assert_eq!(s.evaluate(dec!(5)), Weights::NEUTRAL);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut s = signal(2, 4);
        for i in 0..100 {
            s.evaluate(Decimal::from(i));
        }
        assert_eq!(s.history.len(), 5);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for w in [Weights::NEUTRAL, Weights::BULLISH, Weights::BEARISH] {
            assert!((w.buy + w.sell + w.hold - 1.0).abs() < 1e-9);
        }
    }
}
