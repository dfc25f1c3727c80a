//! Agora Clock Infrastructure
//!
//! Discrete simulated time for the tick loop:
//!
//! ```text
//! (start, end, Granularity) ──► TimeGrid [t0, t1, ... tn)   computed once
//!                                   │
//!                                   ▼
//!                           SimulationClock   Ready ─► Running ─► Finished
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use agora_clock::{Granularity, SimulationClock, TimeGrid};
//!
//! let grid = TimeGrid::new(start, end, Granularity::Day)?;
//! let mut clock = SimulationClock::new(grid);
//! while let Some(now) = clock.advance() {
//!     // one tick at `now`
//! }
//! ```

mod error;
mod granularity;
mod grid;
mod simulation;

pub use error::{ClockError, Result};
pub use granularity::Granularity;
pub use grid::TimeGrid;
pub use simulation::{ClockState, SimulationClock};
