//! Simulation loop
//!
//! Single-threaded and strictly sequential: one tick completes (all agents
//! invoked, then settlements drained) before the next begins.

use agora_clock::{ClockState, Granularity, SimulationClock, TimeGrid};
use agora_core::{AgentId, Cash, Participant, Price, Ticker, Timestamp};
use agora_exchange::{Exchange, ExchangeConfig, PriceBar};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::account::AgentAccount;
use crate::agent::{Agent, AgentContext};
use crate::config::SimulatorConfig;
use crate::error::{Result, SimulationError};
use crate::portfolio::{PortfolioPoint, portfolio_history};
use crate::registry::AgentRegistry;

/// Outcome of [`Simulator::run`] / [`Simulator::run_until`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks executed by this call
    pub ticks: usize,
    /// Size of the trade log when the call returned, listing trades included
    pub trades: usize,
    /// True if the stop flag ended the run before the grid was exhausted
    pub interrupted: bool,
}

/// Owns the exchange, the agents and the clock for one run
pub struct Simulator {
    exchange: Exchange,
    registry: AgentRegistry,
    clock: SimulationClock,
}

impl Simulator {
    /// Create a simulator over `[start, end)` stepped by `granularity`
    ///
    /// The exchange clock starts at `start`, so anything listed before the
    /// first tick is stamped with it.
    pub fn new(
        start: Timestamp,
        end: Timestamp,
        granularity: Granularity,
        exchange_config: ExchangeConfig,
    ) -> Result<Self> {
        let grid = TimeGrid::new(start, end, granularity)?;
        info!(
            "Simulation grid: {} ticks of one {} from {}",
            grid.len(),
            granularity,
            start
        );
        Ok(Self {
            exchange: Exchange::new(exchange_config, start),
            registry: AgentRegistry::new(),
            clock: SimulationClock::new(grid),
        })
    }

    /// Build the grid and exchange and list every configured asset
    pub fn from_config(config: SimulatorConfig) -> Result<Self> {
        let mut sim = Self::new(config.start, config.end, config.granularity, config.exchange)?;
        let defaults = sim.exchange.config().clone();
        for asset in config.assets {
            sim.exchange.create_asset(
                asset.ticker,
                asset.seed_price,
                asset.seed_bid_pct.unwrap_or(defaults.seed_bid_pct),
                asset.seed_ask_pct.unwrap_or(defaults.seed_ask_pct),
            )?;
        }
        Ok(sim)
    }

    /// List an asset with the exchange's default seed spread
    pub fn create_asset(&mut self, ticker: impl Into<Ticker>, seed_price: Price) -> Result<()> {
        self.exchange.create_asset_default(ticker, seed_price)?;
        Ok(())
    }

    /// Register an agent; only allowed before the first tick
    ///
    /// Every ticker of interest must already be listed.
    pub fn add_agent<I, T>(
        &mut self,
        name: impl Into<String>,
        tickers: I,
        initial_cash: Cash,
        agent: impl Agent + 'static,
    ) -> Result<AgentId>
    where
        I: IntoIterator<Item = T>,
        T: Into<Ticker>,
    {
        if self.clock.state() != ClockState::Ready {
            return Err(SimulationError::RegistrationClosed);
        }
        let name = name.into();
        let tickers: Vec<Ticker> = tickers.into_iter().map(Into::into).collect();
        for ticker in &tickers {
            self.exchange.book(ticker)?;
        }

        let id = self
            .registry
            .register(name.clone(), tickers, initial_cash, Box::new(agent))?;
        info!("Registered {} as {} with cash {}", name, id, initial_cash);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------

    /// Run one tick
    ///
    /// Returns `Ok(None)` once the grid is exhausted. An agent error aborts
    /// the tick before settlement.
    pub fn tick(&mut self) -> Result<Option<Timestamp>> {
        let Some(now) = self.clock.advance() else {
            return Ok(None);
        };
        trace!("Tick {} at {}", self.clock.elapsed().len(), now);
        self.exchange.set_clock(now);

        for entry in self.registry.entries_mut() {
            let mut ctx = AgentContext::new(&entry.account, &mut self.exchange);
            entry
                .agent
                .next(&mut ctx)
                .map_err(|source| SimulationError::AgentFailed {
                    agent: entry.account.name().to_string(),
                    source,
                })?;
        }

        self.settle()?;
        Ok(Some(now))
    }

    /// Tick until the grid is exhausted
    pub fn run(&mut self) -> Result<RunSummary> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Tick until the grid is exhausted or `stop` is set
    ///
    /// `stop` is checked between ticks only; a tick in progress always completes.
    pub fn run_until(&mut self, stop: &AtomicBool) -> Result<RunSummary> {
        info!(
            "Running {} ticks with {} agents",
            self.clock.remaining(),
            self.registry.len()
        );
        let mut ticks = 0;
        let mut interrupted = false;
        loop {
            if stop.load(Ordering::Relaxed) {
                interrupted = true;
                break;
            }
            if self.tick()?.is_none() {
                break;
            }
            ticks += 1;
        }

        let summary = RunSummary {
            ticks,
            trades: self.exchange.trade_log().len(),
            interrupted,
        };
        if interrupted {
            info!("Simulation stopped after {} ticks", ticks);
        } else {
            info!(
                "Simulation finished: {} ticks, {} trades",
                summary.ticks, summary.trades
            );
        }
        Ok(summary)
    }

    /// Drain pending settlements into agent ledgers
    ///
    /// The only place balances change. Legs of the seed participant are
    /// skipped. Returns the number of legs applied; a second call with no
    /// new trades applies nothing.
    ///
    /// Every leg is checked against the registry before the queue is drained,
    /// so a leg for an unknown agent leaves all balances and the queue untouched.
    pub fn settle(&mut self) -> Result<usize> {
        for leg in self.exchange.pending_settlements() {
            if let Some(id) = leg.participant.agent_id() {
                self.registry.account(id)?;
            }
        }

        let legs = self.exchange.drain_settlements();
        let mut applied = 0;
        for leg in &legs {
            let Participant::Agent(id) = leg.participant else {
                continue;
            };
            self.registry.account_mut(id)?.apply(leg);
            applied += 1;
        }
        if !legs.is_empty() {
            debug!("Settled {} legs ({} to agents)", legs.len(), applied);
        }
        Ok(applied)
    }

    // ------------------------------------------------------------------
    // Analytics
    // ------------------------------------------------------------------

    /// Account value of an agent at every elapsed tick
    pub fn portfolio_history(&self, name: &str) -> Result<Vec<PortfolioPoint>> {
        let account = self.registry.account_by_name(name)?;
        Ok(portfolio_history(
            account,
            self.exchange.trade_log(),
            self.clock.elapsed(),
            self.clock.granularity().step(),
        ))
    }

    /// OHLCV bars at the simulation granularity
    pub fn price_bars(&self, ticker: &str) -> Result<Vec<PriceBar>> {
        Ok(self.exchange.price_bars(ticker, self.clock.granularity())?)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    /// Mutable exchange access, for setting up a market before the run
    pub fn exchange_mut(&mut self) -> &mut Exchange {
        &mut self.exchange
    }

    pub fn account(&self, name: &str) -> Result<&AgentAccount> {
        self.registry.account_by_name(name)
    }

    pub fn agent_id(&self, name: &str) -> Result<AgentId> {
        self.registry.id_of(name)
    }

    /// Agent accounts in registration order
    pub fn agents(&self) -> impl Iterator<Item = &AgentAccount> + '_ {
        self.registry.accounts()
    }

    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    /// Timestamp of the last tick, `None` before the first
    pub fn now(&self) -> Option<Timestamp> {
        self.clock.now()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }
}
