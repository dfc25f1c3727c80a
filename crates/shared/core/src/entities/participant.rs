use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a registered agent
///
/// Dense index assigned at registration time; stable for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the agent in registration order
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Creator of an order or counterparty of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    /// A registered trading agent
    Agent(AgentId),
    /// Reserved identity of the synthetic liquidity placed when an asset is created.
    /// Never settled against an agent account.
    Seed,
}

impl Participant {
    pub fn is_seed(&self) -> bool {
        matches!(self, Participant::Seed)
    }

    pub fn agent_id(&self) -> Option<AgentId> {
        match self {
            Participant::Agent(id) => Some(*id),
            Participant::Seed => None,
        }
    }
}

impl From<AgentId> for Participant {
    fn from(id: AgentId) -> Self {
        Participant::Agent(id)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Agent(id) => write!(f, "{}", id),
            Participant::Seed => write!(f, "seed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_participant_tags() {
        let json = serde_json::to_string(&Participant::Seed).unwrap();
        assert_eq!(json, "\"seed\"");

        let json = serde_json::to_string(&Participant::Agent(AgentId::new(3))).unwrap();
        assert_eq!(json, r#"{"agent":3}"#);
    }

    #[test]
    fn test_agent_handle() {
        let p = Participant::from(AgentId::new(2));
        assert_eq!(p.agent_id(), Some(AgentId::new(2)));
        assert!(!p.is_seed());
        assert_eq!(Participant::Seed.agent_id(), None);
        assert_eq!(p.to_string(), "agent#2");
    }
}
