//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, time passed in as simulated milliseconds
//! - Seeded RNG only
//! - Stable iteration order (layout order for blocks and spikes)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod physics;
pub mod rect;
pub mod season;
pub mod state;
pub mod tick;

pub use collision::{Trigger, TriggerFlags, evaluate_triggers};
pub use level::{LevelCatalog, LevelError, LevelLayout, LevelSource};
pub use physics::{PlayerBody, StepEvents, is_grounded};
pub use rect::{Rect, aabb_overlap};
pub use season::{PendingTransition, Season, TransitionKind};
pub use state::{
    FailureReason, GameEvent, GameSessionSummary, RngState, SeasonPhase, SeasonState, Snapshot,
};
pub use tick::{TickInput, tick};
