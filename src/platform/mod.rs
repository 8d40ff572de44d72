//! Platform abstraction layer
//!
//! The seams between the simulation and its host:
//! - Input (current movement intent)
//! - Rendering (read-only snapshots)
//! - Reward delivery (summary plus computed rewards)
//! - Level data (`LevelSource`, defined with the level store)

pub mod input;

pub use input::{Action, InputState, KeyBindings};
pub use crate::sim::LevelSource;

use crate::rewards::GameRewards;
use crate::sim::{GameSessionSummary, Snapshot, TickInput};

/// Supplies the movement intent for the next frame
pub trait InputSource {
    fn intent(&self) -> TickInput;
}

/// Fixed scripted input
impl InputSource for TickInput {
    fn intent(&self) -> TickInput {
        *self
    }
}

/// Receives a snapshot after each update
pub trait RenderTarget {
    fn present(&mut self, snapshot: &Snapshot);
}

/// Receives the rewards of a completed season
pub trait RewardSink {
    fn submit(&mut self, summary: &GameSessionSummary, rewards: &GameRewards);
}

impl<F> RewardSink for F
where
    F: FnMut(&GameSessionSummary, &GameRewards),
{
    fn submit(&mut self, summary: &GameSessionSummary, rewards: &GameRewards) {
        self(summary, rewards)
    }
}
