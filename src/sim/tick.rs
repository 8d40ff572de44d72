//! Fixed timestep simulation tick
//!
//! One frame: fire due transitions, step the player, evaluate triggers
//! against the current layout and feed them to the season.

use serde::{Deserialize, Serialize};

use super::collision::{TriggerFlags, evaluate_triggers};
use super::level::LevelSource;
use super::physics::{self, PlayerBody, StepEvents};
use super::season::Season;
use super::state::{GameEvent, SeasonPhase};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Move left (wins over right)
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the season by one fixed frame ending at `now_ms`
pub fn tick<L: LevelSource>(season: &mut Season<L>, input: &TickInput, now_ms: u64) -> StepEvents {
    season.advance(now_ms);

    // Physics is paused outside active play
    if season.state.phase != SeasonPhase::Playing {
        return StepEvents::default();
    }

    let index = season.state.current_level_index;
    let Some(layout) = season.levels.level(index) else {
        log::warn!("No layout for level {}", index);
        return StepEvents::default();
    };

    let step = physics::step(&mut season.body, &layout.blocks, input, &season.physics);

    if step.fell_out {
        log::warn!("Player fell out of level {}, respawning", index);
        season.body = PlayerBody::spawn(layout.player_spawn, &season.physics);
        season.events.push(GameEvent::Respawned { level: index });
        return step;
    }

    let flags = TriggerFlags {
        key_collected: season.state.key_collected_this_level,
        level_won: season.state.level_won,
        invincible: season.state.is_invincible(now_ms),
    };
    let triggers = evaluate_triggers(&season.body.hitbox(), layout, flags);
    for trigger in triggers {
        season.handle(trigger, now_ms);
    }

    step
}
