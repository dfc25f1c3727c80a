use agora_clock::ClockError;
use agora_core::AgentId;
use agora_exchange::{ConfigError, ExchangeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An agent's `next` returned an error; the tick was aborted
    #[error("Agent '{agent}' failed: {source}")]
    AgentFailed {
        agent: String,
        #[source]
        source: ExchangeError,
    },

    #[error("Agent name already registered: {0}")]
    DuplicateAgent(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Unknown agent id: {0}")]
    UnknownAgentId(AgentId),

    #[error("Agents must be registered before the first tick")]
    RegistrationClosed,
}

pub type Result<T> = std::result::Result<T, SimulationError>;
