//! Trigger detection
//!
//! Per-frame AABB checks of the player hitbox against the key, the door and
//! every spike. Evaluation order is key, door, spikes.

use serde::{Deserialize, Serialize};

use super::level::LevelLayout;
use super::rect::Rect;

/// A gameplay trigger raised by the player's hitbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Player touched the level's key
    KeyCollected,
    /// Player reached the door while holding the key
    DoorReached,
    /// Player touched a spike while vulnerable
    SpikeHit,
}

/// Per-level state the evaluator needs to decide what may fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerFlags {
    pub key_collected: bool,
    pub level_won: bool,
    pub invincible: bool,
}

/// Triggers raised this frame, in processing order
pub fn evaluate_triggers(hitbox: &Rect, layout: &LevelLayout, flags: TriggerFlags) -> Vec<Trigger> {
    let mut triggers = Vec::with_capacity(3);
    let mut key_collected = flags.key_collected;

    if !key_collected && hitbox.overlaps(&layout.key) {
        triggers.push(Trigger::KeyCollected);
        key_collected = true;
    }

    if key_collected && !flags.level_won && hitbox.overlaps(&layout.door) {
        triggers.push(Trigger::DoorReached);
    }

    if !flags.invincible && layout.spikes.iter().any(|s| hitbox.overlaps(s)) {
        triggers.push(Trigger::SpikeHit);
    }

    triggers
}
