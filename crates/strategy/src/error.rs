use agora_exchange::ConfigError;
use agora_runner::SimulationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    /// Rejected at construction, never at tick time
    #[error("Invalid strategy config: {0}")]
    InvalidConfig(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

pub type Result<T> = std::result::Result<T, StrategyError>;
