use agora_core::Timestamp;
use chrono::{DateTime, Duration};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ClockError;

/// Step size of the simulation and bucket size of bar aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
}

impl Granularity {
    /// Fixed duration between two consecutive ticks
    pub fn step(&self) -> Duration {
        match self {
            Granularity::Second => Duration::seconds(1),
            Granularity::Minute => Duration::minutes(1),
            Granularity::Hour => Duration::hours(1),
            Granularity::Day => Duration::days(1),
        }
    }

    /// Start of the epoch-aligned bucket containing `ts` (floor)
    pub fn bucket_start(&self, ts: Timestamp) -> Timestamp {
        let step = self.step().num_seconds();
        let secs = ts.timestamp().div_euclid(step) * step;
        // Flooring an in-range timestamp by at most a day stays in range
        DateTime::from_timestamp(secs, 0).unwrap_or(ts)
    }

    /// Exclusive end of the bucket containing `ts`
    pub fn bucket_end(&self, ts: Timestamp) -> Timestamp {
        self.bucket_start(ts) + self.step()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "second" | "s" | "1s" => Ok(Granularity::Second),
            "minute" | "min" | "1min" => Ok(Granularity::Minute),
            "hour" | "h" | "1h" => Ok(Granularity::Hour),
            "day" | "d" | "1day" => Ok(Granularity::Day),
            other => Err(ClockError::UnknownGranularity(other.to_string())),
        }
    }
}
