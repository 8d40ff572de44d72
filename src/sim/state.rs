//! Season state and core simulation types
//!
//! Everything the renderer or a save needs lives here and is serializable.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::SeasonSettings;

/// Current phase of the season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonPhase {
    /// Active gameplay on the current level
    Playing,
    /// Door reached, waiting to load the next level
    LevelTransition,
    /// All levels cleared
    SeasonComplete,
    /// Out of hearts or time, waiting for the full reset
    SeasonFailed,
}

/// Why a season failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    OutOfHearts,
    OutOfTime,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Draw a session id and move to the next stream
    pub fn next_session_id(&mut self) -> u64 {
        let id = self.to_rng().random::<u64>();
        self.stream += 1;
        id
    }
}

/// Mutable state of one play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonState {
    /// 1-based level number
    pub current_level_index: u32,
    pub hearts_remaining: u8,
    pub time_remaining_seconds: u32,
    pub key_collected_this_level: bool,
    /// Door already actioned on this level
    pub level_won: bool,
    /// Spike hits before this instant (ms) are ignored
    pub invincible_until: Option<u64>,
    pub phase: SeasonPhase,
    /// Countdown is live
    pub timer_running: bool,
    /// Doors actioned this season
    pub levels_completed: u32,
    pub took_damage: bool,
    /// Spike hits that cost a heart
    pub deaths: u32,
    /// Full resets since the session began
    pub resets: u32,
    pub session_id: u64,
    pub started_at_ms: u64,
}

impl SeasonState {
    /// Initial values for a fresh season
    pub fn new(settings: &SeasonSettings, session_id: u64, now_ms: u64) -> Self {
        Self {
            current_level_index: 1,
            hearts_remaining: settings.starting_hearts,
            time_remaining_seconds: settings.time_budget_seconds,
            key_collected_this_level: false,
            level_won: false,
            invincible_until: None,
            phase: SeasonPhase::Playing,
            timer_running: true,
            levels_completed: 0,
            took_damage: false,
            deaths: 0,
            resets: 0,
            session_id,
            started_at_ms: now_ms,
        }
    }

    /// Whether the grace window after damage is still open
    pub fn is_invincible(&self, now_ms: u64) -> bool {
        self.invincible_until.is_some_and(|until| now_ms < until)
    }

    /// Keys picked up on levels that were cleared or are in progress
    pub fn collectibles_found(&self) -> u32 {
        let pending = self.key_collected_this_level && !self.level_won;
        self.levels_completed + pending as u32
    }

    /// Score under the season scoring rules
    pub fn score(&self, completed: bool) -> u64 {
        let mut score = LEVEL_CLEAR_POINTS * self.levels_completed as u64;
        if completed {
            score += TIME_BONUS_POINTS * self.time_remaining_seconds as u64;
            score += HEART_BONUS_POINTS * self.hearts_remaining as u64;
        }
        score
    }

    /// Summarize the session for the reward calculator
    pub fn summary(&self, settings: &SeasonSettings) -> GameSessionSummary {
        let completed = self.phase == SeasonPhase::SeasonComplete;
        GameSessionSummary {
            session_id: self.session_id,
            final_score: self.score(completed),
            levels_completed: self.levels_completed,
            elapsed_seconds: settings
                .time_budget_seconds
                .saturating_sub(self.time_remaining_seconds),
            took_damage: self.took_damage,
            within_time_limit: self.time_remaining_seconds > 0,
            completed,
            hearts_remaining: self.hearts_remaining,
            collectibles_found: self.collectibles_found(),
            enemies_defeated: 0,
        }
    }
}

/// Record of a finished (or abandoned) season; never mutated after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSessionSummary {
    pub session_id: u64,
    pub final_score: u64,
    pub levels_completed: u32,
    pub elapsed_seconds: u32,
    pub took_damage: bool,
    pub within_time_limit: bool,
    /// Every level cleared
    pub completed: bool,
    pub hearts_remaining: u8,
    #[serde(default)]
    pub collectibles_found: u32,
    /// No enemies in this game; kept for the general XP formula
    #[serde(default)]
    pub enemies_defeated: u32,
}

/// Notifications for the host, drained once per update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    KeyCollected { level: u32 },
    LevelCleared { level: u32 },
    DamageTaken { hearts_remaining: u8 },
    /// Player fell below the level and was put back at the spawn
    Respawned { level: u32 },
    SeasonFailed { reason: FailureReason },
    SeasonReset { session_id: u64 },
    SeasonComplete(GameSessionSummary),
}

/// Read-only view for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: SeasonPhase,
    pub level_index: u32,
    pub level_name: String,
    pub hearts_remaining: u8,
    pub time_remaining_seconds: u32,
    pub key_collected: bool,
    pub invincible: bool,
    pub player_position: Vec2,
    pub player_velocity: Vec2,
}
