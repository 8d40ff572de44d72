//! Duck Season - level, hearts and rewards core for the Duck Game platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, triggers, season state machine)
//! - `rewards`: XP ladder, badge catalog and season reward calculation
//! - `game_loop`: Fixed-timestep driver serializing frames and timer ticks
//! - `platform`: Host-facing input/render/reward interfaces
//! - `profile`: Typed mapping of remote player profiles
//! - `settings`: Data-driven physics and season tuning

pub mod game_loop;
pub mod platform;
pub mod profile;
pub mod rewards;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game_loop::GameLoop;
pub use rewards::{GameRewards, PlayerProgress, PlayerProgressCounters, RewardCalculator};
pub use settings::Settings;
pub use sim::{GameEvent, GameSessionSummary, LevelCatalog, Season, SeasonPhase, TickInput};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one physics step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frames per second of simulated time
    pub const FRAMES_PER_SECOND: u64 = 60;
    /// Maximum substeps per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the driver (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Level dimensions (pixels)
    pub const LEVEL_WIDTH: f32 = 768.0;
    pub const LEVEL_HEIGHT: f32 = 768.0;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;

    /// Horizontal speed while a direction is held (units/frame)
    pub const MOVE_SPEED: f32 = 3.5;
    /// Vertical velocity applied on jump (negative is up, units/frame)
    pub const JUMP_IMPULSE: f32 = -20.0;
    /// Downward acceleration (units/frame²): 1.5 × 0.001 × (1000/60)²
    pub const GRAVITY: f32 = 0.416_666_7;
    /// Distance below the feet probed for ground contact
    pub const GROUND_PROBE: f32 = 1.0;
    /// Largest ledge climbed while moving sideways
    pub const STEP_HEIGHT: f32 = 6.0;

    /// Season shape
    pub const LEVEL_COUNT: u32 = 5;
    pub const START_HEARTS: u8 = 3;
    pub const SEASON_TIME_SECONDS: u32 = 300;

    /// Delays (milliseconds of simulated time)
    pub const INVINCIBILITY_MS: u64 = 2_000;
    pub const LEVEL_TRANSITION_MS: u64 = 2_000;
    pub const HEARTS_RESET_MS: u64 = 2_000;
    pub const TIMEOUT_RESET_MS: u64 = 3_000;

    /// Scoring
    pub const LEVEL_CLEAR_POINTS: u64 = 1_000;
    pub const TIME_BONUS_POINTS: u64 = 20;
    pub const HEART_BONUS_POINTS: u64 = 500;
}

/// Convert a frame count to milliseconds of simulated time
#[inline]
pub fn frames_to_ms(frames: u64) -> u64 {
    frames * 1000 / consts::FRAMES_PER_SECOND
}
