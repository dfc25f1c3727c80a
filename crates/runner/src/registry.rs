use agora_core::{AgentId, Cash, Ticker};
use std::collections::HashMap;

use crate::account::AgentAccount;
use crate::agent::Agent;
use crate::error::{Result, SimulationError};

pub(crate) struct RegisteredAgent {
    pub(crate) account: AgentAccount,
    pub(crate) agent: Box<dyn Agent>,
}

/// Registered agents in registration order
///
/// An [`AgentId`] is the agent's index in that order; names resolve to ids
/// through a dedicated map.
#[derive(Default)]
pub struct AgentRegistry {
    entries: Vec<RegisteredAgent>,
    by_name: HashMap<String, AgentId>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: String,
        tickers: Vec<Ticker>,
        initial_cash: Cash,
        agent: Box<dyn Agent>,
    ) -> Result<AgentId> {
        if self.by_name.contains_key(&name) {
            return Err(SimulationError::DuplicateAgent(name));
        }
        let id = AgentId::new(self.entries.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.entries.push(RegisteredAgent {
            account: AgentAccount::new(id, name, tickers, initial_cash),
            agent,
        });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Result<AgentId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SimulationError::UnknownAgent(name.to_string()))
    }

    pub fn account(&self, id: AgentId) -> Result<&AgentAccount> {
        self.entries
            .get(id.index())
            .map(|entry| &entry.account)
            .ok_or(SimulationError::UnknownAgentId(id))
    }

    pub fn account_by_name(&self, name: &str) -> Result<&AgentAccount> {
        self.account(self.id_of(name)?)
    }

    /// Accounts in registration order
    pub fn accounts(&self) -> impl Iterator<Item = &AgentAccount> + '_ {
        self.entries.iter().map(|entry| &entry.account)
    }

    pub(crate) fn account_mut(&mut self, id: AgentId) -> Result<&mut AgentAccount> {
        self.entries
            .get_mut(id.index())
            .map(|entry| &mut entry.account)
            .ok_or(SimulationError::UnknownAgentId(id))
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [RegisteredAgent] {
        &mut self.entries
    }
}
