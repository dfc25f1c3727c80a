//! Agent accounts: cash balance plus an append-only transaction ledger.
//!
//! Positions are never stored; they are summed from the ledger on demand.

use agora_core::{
    AgentId, Cash, LedgerEntry, Settlement, SignedQuantity, Ticker, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cash balance right after a ledger entry was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashPoint {
    pub timestamp: Timestamp,
    pub cash: Cash,
}

#[derive(Debug, Clone)]
pub struct AgentAccount {
    id: AgentId,
    name: String,
    tickers: Vec<Ticker>,
    initial_cash: Cash,
    cash: Cash,
    ledger: Vec<LedgerEntry>,
}

impl AgentAccount {
    pub fn new(id: AgentId, name: impl Into<String>, tickers: Vec<Ticker>, initial_cash: Cash) -> Self {
        Self {
            id,
            name: name.into(),
            tickers,
            initial_cash,
            cash: initial_cash,
            ledger: Vec::new(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tickers of interest, in the order given at registration
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn initial_cash(&self) -> Cash {
        self.initial_cash
    }

    pub fn cash(&self) -> Cash {
        self.cash
    }

    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    /// Net position: sum of signed quantities over the ledger
    pub fn position(&self, ticker: &str) -> SignedQuantity {
        self.ledger
            .iter()
            .filter(|e| e.ticker == ticker)
            .map(|e| e.qty)
            .sum()
    }

    /// Net position in every ticker the agent has traded
    pub fn positions(&self) -> BTreeMap<Ticker, SignedQuantity> {
        let mut positions = BTreeMap::new();
        for entry in &self.ledger {
            *positions.entry(entry.ticker.clone()).or_insert(0) += entry.qty;
        }
        positions
    }

    /// Running cash balance, one point per ledger entry
    pub fn cash_history(&self) -> Vec<CashPoint> {
        let mut cash = self.initial_cash;
        self.ledger
            .iter()
            .map(|entry| {
                cash += entry.cash_flow;
                CashPoint {
                    timestamp: entry.timestamp,
                    cash,
                }
            })
            .collect()
    }

    /// Book one settlement leg. Only the simulator's drain calls this.
    pub(crate) fn apply(&mut self, settlement: &Settlement) {
        self.cash += settlement.cash_flow;
        self.ledger.push(settlement.to_ledger_entry());
    }
}
