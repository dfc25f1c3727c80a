use agora_core::Timestamp;

use crate::{Granularity, TimeGrid};

/// Lifecycle of a simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// No tick issued yet
    Ready,
    /// At least one tick issued and more remain
    Running,
    /// Every timestamp of the grid has been issued
    Finished,
}

/// Cursor over a [`TimeGrid`], advanced once per tick by the simulator
#[derive(Debug, Clone)]
pub struct SimulationClock {
    grid: TimeGrid,
    /// Number of timestamps issued so far
    issued: usize,
}

impl SimulationClock {
    pub fn new(grid: TimeGrid) -> Self {
        Self { grid, issued: 0 }
    }

    /// Move to the next timestamp
    ///
    /// Returns `None` once the grid is exhausted; normal termination, not an error.
    pub fn advance(&mut self) -> Option<Timestamp> {
        let next = self.grid.timestamps().get(self.issued).copied()?;
        self.issued += 1;
        Some(next)
    }

    /// Timestamp of the current tick, if one has been issued
    pub fn now(&self) -> Option<Timestamp> {
        self.elapsed().last().copied()
    }

    pub fn state(&self) -> ClockState {
        if self.issued == 0 {
            ClockState::Ready
        } else if self.issued < self.grid.len() {
            ClockState::Running
        } else {
            ClockState::Finished
        }
    }

    /// Timestamps already issued, in order
    pub fn elapsed(&self) -> &[Timestamp] {
        &self.grid.timestamps()[..self.issued]
    }

    pub fn remaining(&self) -> usize {
        self.grid.len() - self.issued
    }

    pub fn granularity(&self) -> Granularity {
        self.grid.granularity()
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn clock(ticks: i64) -> SimulationClock {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        let grid = TimeGrid::new(start, start + Duration::minutes(ticks), Granularity::Minute)
            .unwrap();
        SimulationClock::new(grid)
    }

    #[test]
    fn test_state_machine() {
        let mut clock = clock(2);
        assert_eq!(clock.state(), ClockState::Ready);
        assert_eq!(clock.now(), None);

        let t0 = clock.advance().unwrap();
        assert_eq!(clock.state(), ClockState::Running);
        assert_eq!(clock.now(), Some(t0));

        let t1 = clock.advance().unwrap();
        assert_eq!(t1 - t0, Duration::minutes(1));
        assert_eq!(clock.state(), ClockState::Finished);

        assert_eq!(clock.advance(), None);
        assert_eq!(clock.advance(), None);
        assert_eq!(clock.now(), Some(t1));
    }

    #[test]
    fn test_elapsed_and_remaining() {
        let mut clock = clock(5);
        assert_eq!(clock.remaining(), 5);

        clock.advance();
        clock.advance();

        assert_eq!(clock.elapsed().len(), 2);
        assert_eq!(clock.remaining(), 3);
        assert_eq!(clock.granularity(), Granularity::Minute);
    }
}
