use agora_core::Timestamp;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Time range is empty: end {end} is not after start {start}")]
    EmptyRange { start: Timestamp, end: Timestamp },

    #[error("Unknown granularity: {0} (expected second, minute, hour or day)")]
    UnknownGranularity(String),
}

pub type Result<T> = std::result::Result<T, ClockError>;
