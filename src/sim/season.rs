//! Season progression state machine
//!
//! Owns the level index, hearts, countdown and invincibility window. Consumes
//! triggers and 1 Hz timer ticks; delayed transitions are stored here and fire
//! from `advance`. Failure is a phase, never an error.

use serde::{Deserialize, Serialize};

use super::collision::Trigger;
use super::level::{LevelCatalog, LevelError, LevelLayout, LevelSource};
use super::physics::PlayerBody;
use super::state::{
    FailureReason, GameEvent, GameSessionSummary, RngState, SeasonPhase, SeasonState, Snapshot,
};
use crate::settings::{PhysicsSettings, SeasonSettings, Settings};

/// What a scheduled transition does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Load the next level, or complete the season after the last one
    AdvanceLevel,
    /// Start over from level 1 with full hearts and time
    ResetSeason,
}

/// A delayed transition waiting for `fire_at` (ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    pub fire_at: u64,
    pub kind: TransitionKind,
}

/// One play session over a level source
pub struct Season<L: LevelSource = LevelCatalog> {
    pub(super) state: SeasonState,
    pub(super) body: PlayerBody,
    pub(super) levels: L,
    pub(super) settings: SeasonSettings,
    pub(super) physics: PhysicsSettings,
    rng: RngState,
    pending: Option<PendingTransition>,
    pub(super) events: Vec<GameEvent>,
}

impl Season<LevelCatalog> {
    /// Season over the built-in levels
    pub fn with_builtin_levels(settings: &Settings, seed: u64, now_ms: u64) -> Result<Self, LevelError> {
        let levels = LevelCatalog::builtin(&settings.physics)?;
        Self::new(levels, settings, seed, now_ms)
    }
}

impl<L: LevelSource> Season<L> {
    /// Start a season on level 1. Every level the season needs must be present.
    pub fn new(levels: L, settings: &Settings, seed: u64, now_ms: u64) -> Result<Self, LevelError> {
        let count = settings.season.level_count;
        for index in 1..=count {
            if levels.level(index).is_none() {
                return Err(LevelError::Missing(index));
            }
        }
        let first = levels.level(1).ok_or(LevelError::Missing(1))?;
        let body = PlayerBody::spawn(first.player_spawn, &settings.physics);

        let mut rng = RngState::new(seed);
        let state = SeasonState::new(&settings.season, rng.next_session_id(), now_ms);
        log::info!(
            "Season {:016x} started: {} levels, {} hearts, {}s",
            state.session_id,
            count,
            state.hearts_remaining,
            state.time_remaining_seconds
        );

        Ok(Self {
            state,
            body,
            levels,
            settings: settings.season.clone(),
            physics: settings.physics.clone(),
            rng,
            pending: None,
            events: vec![GameEvent::LevelStarted { level: 1 }],
        })
    }

    pub fn state(&self) -> &SeasonState {
        &self.state
    }

    pub fn body(&self) -> &PlayerBody {
        &self.body
    }

    pub fn phase(&self) -> SeasonPhase {
        self.state.phase
    }

    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    pub fn levels(&self) -> &L {
        &self.levels
    }

    /// Layout of the level being played
    pub fn layout(&self) -> Option<&LevelLayout> {
        self.levels.level(self.state.current_level_index)
    }

    /// Apply one trigger at `now_ms`
    pub fn handle(&mut self, trigger: Trigger, now_ms: u64) {
        log::debug!("Trigger {:?} at {}ms", trigger, now_ms);
        match trigger {
            Trigger::KeyCollected => self.collect_key(),
            Trigger::DoorReached => self.reach_door(now_ms),
            Trigger::SpikeHit => self.hit_spike(now_ms),
        }
    }

    fn collect_key(&mut self) {
        if self.state.phase != SeasonPhase::Playing || self.state.key_collected_this_level {
            return;
        }
        self.state.key_collected_this_level = true;
        let level = self.state.current_level_index;
        log::info!("Key collected on level {}", level);
        self.events.push(GameEvent::KeyCollected { level });
    }

    fn reach_door(&mut self, now_ms: u64) {
        let state = &mut self.state;
        if state.phase != SeasonPhase::Playing || !state.key_collected_this_level || state.level_won {
            return;
        }
        state.level_won = true;
        state.levels_completed += 1;
        state.phase = SeasonPhase::LevelTransition;
        let level = state.current_level_index;
        log::info!("Level {} cleared ({} remaining)", level, state.time_remaining_seconds);

        self.events.push(GameEvent::LevelCleared { level });
        self.pending = Some(PendingTransition {
            fire_at: now_ms + self.settings.level_transition_ms,
            kind: TransitionKind::AdvanceLevel,
        });
    }

    fn hit_spike(&mut self, now_ms: u64) {
        if self.state.phase != SeasonPhase::Playing || self.state.is_invincible(now_ms) {
            return;
        }
        let state = &mut self.state;
        state.hearts_remaining = state.hearts_remaining.saturating_sub(1);
        state.took_damage = true;
        state.deaths += 1;
        let hearts_remaining = state.hearts_remaining;
        log::info!("Spike hit, {} hearts left", hearts_remaining);
        self.events.push(GameEvent::DamageTaken { hearts_remaining });

        if hearts_remaining == 0 {
            self.fail(FailureReason::OutOfHearts, now_ms + self.settings.hearts_reset_ms);
        } else {
            self.load_level(self.state.current_level_index);
            self.state.invincible_until = Some(now_ms + self.settings.invincibility_ms);
        }
    }

    /// One second of the season countdown
    pub fn timer_tick(&mut self, now_ms: u64) {
        let state = &mut self.state;
        if !state.timer_running
            || !matches!(state.phase, SeasonPhase::Playing | SeasonPhase::LevelTransition)
        {
            return;
        }
        state.time_remaining_seconds = state.time_remaining_seconds.saturating_sub(1);
        if state.time_remaining_seconds == 0 {
            self.fail(FailureReason::OutOfTime, now_ms + self.settings.timeout_reset_ms);
        }
    }

    /// Fire the pending transition if it is due
    pub fn advance(&mut self, now_ms: u64) {
        let Some(pending) = self.pending else {
            return;
        };
        if now_ms < pending.fire_at {
            return;
        }
        self.pending = None;

        match pending.kind {
            TransitionKind::AdvanceLevel => {
                let next = self.state.current_level_index + 1;
                if next <= self.settings.level_count {
                    self.load_level(next);
                } else {
                    self.complete();
                }
            }
            TransitionKind::ResetSeason => self.reset(now_ms),
        }
    }

    /// Drop any scheduled transition
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!("Cancelled pending {:?}", pending.kind);
        }
    }

    /// Summary of the session so far
    pub fn summary(&self) -> GameSessionSummary {
        self.state.summary(&self.settings)
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Renderable view of the season at `now_ms`
    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            level_index: self.state.current_level_index,
            level_name: self.layout().map(|l| l.name.clone()).unwrap_or_default(),
            hearts_remaining: self.state.hearts_remaining,
            time_remaining_seconds: self.state.time_remaining_seconds,
            key_collected: self.state.key_collected_this_level,
            invincible: self.state.is_invincible(now_ms),
            player_position: self.body.position,
            player_velocity: self.body.velocity,
        }
    }

    /// Throw the session away and start a new one with a fresh seed
    pub fn restart(&mut self, seed: u64, now_ms: u64) {
        self.rng = RngState::new(seed);
        self.pending = None;
        self.state = SeasonState::new(&self.settings, self.rng.next_session_id(), now_ms);
        self.load_level(1);
        log::info!("Season restarted as {:016x}", self.state.session_id);
    }

    fn fail(&mut self, reason: FailureReason, reset_at: u64) {
        self.state.phase = SeasonPhase::SeasonFailed;
        self.state.timer_running = false;
        log::info!("Season failed: {:?}", reason);
        self.events.push(GameEvent::SeasonFailed { reason });
        self.pending = Some(PendingTransition {
            fire_at: reset_at,
            kind: TransitionKind::ResetSeason,
        });
    }

    fn complete(&mut self) {
        self.state.phase = SeasonPhase::SeasonComplete;
        self.state.timer_running = false;
        let summary = self.summary();
        log::info!(
            "Season complete: score {}, {}s elapsed",
            summary.final_score,
            summary.elapsed_seconds
        );
        self.events.push(GameEvent::SeasonComplete(summary));
    }

    fn reset(&mut self, now_ms: u64) {
        let resets = self.state.resets + 1;
        let session_id = self.rng.next_session_id();
        self.state = SeasonState::new(&self.settings, session_id, now_ms);
        self.state.resets = resets;
        self.load_level(1);
        log::info!("Season reset #{} as {:016x}", resets, session_id);
        self.events.push(GameEvent::SeasonReset { session_id });
    }

    /// Put the player at the spawn of `index` with the per-level flags cleared
    fn load_level(&mut self, index: u32) {
        self.state.current_level_index = index;
        self.state.key_collected_this_level = false;
        self.state.level_won = false;
        self.state.invincible_until = None;
        self.state.phase = SeasonPhase::Playing;
        match self.levels.level(index) {
            Some(layout) => self.body = PlayerBody::spawn(layout.player_spawn, &self.physics),
            None => log::warn!("Level {} missing, keeping current body", index),
        }
        self.events.push(GameEvent::LevelStarted { level: index });
    }
}
