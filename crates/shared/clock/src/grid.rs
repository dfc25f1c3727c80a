use agora_core::Timestamp;

use crate::{ClockError, Granularity, Result};

/// Finite, strictly increasing sequence of tick timestamps
///
/// Covers `[start, end)` in steps of the granularity and is computed once,
/// so every run over the same grid sees the same timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    granularity: Granularity,
    timestamps: Vec<Timestamp>,
}

impl TimeGrid {
    /// Build the grid; fails if `end` is not after `start`
    pub fn new(start: Timestamp, end: Timestamp, granularity: Granularity) -> Result<Self> {
        if end <= start {
            return Err(ClockError::EmptyRange { start, end });
        }

        let step = granularity.step();
        let mut timestamps = Vec::new();
        let mut current = start;
        while current < end {
            timestamps.push(current);
            current += step;
        }

        Ok(Self {
            granularity,
            timestamps,
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// First timestamp of the grid
    pub fn start(&self) -> Timestamp {
        // Construction guarantees at least one timestamp
        self.timestamps[0]
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
