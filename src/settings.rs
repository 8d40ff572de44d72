//! Game settings and tuning
//!
//! Physics and season balance live here so they can be tweaked from JSON
//! without touching the simulation. Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::KeyBindings;

/// Physics tuning for the player body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration (units/frame²)
    pub gravity: f32,
    /// Horizontal speed while a direction is held (units/frame)
    pub move_speed: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_impulse: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Width used for screen wrapping
    pub level_width: f32,
    pub level_height: f32,
    /// Distance below the feet probed for ground contact
    pub ground_probe: f32,
    /// Largest ledge the body climbs instead of stopping against
    pub step_height: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_impulse: JUMP_IMPULSE,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            level_width: LEVEL_WIDTH,
            level_height: LEVEL_HEIGHT,
            ground_probe: GROUND_PROBE,
            step_height: STEP_HEIGHT,
        }
    }
}

/// Season balance: hearts, countdown and transition delays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonSettings {
    /// Number of levels in a season
    pub level_count: u32,
    pub starting_hearts: u8,
    /// Countdown budget for the whole season
    pub time_budget_seconds: u32,
    /// Grace window after taking damage
    pub invincibility_ms: u64,
    /// Pause between reaching a door and the next level
    pub level_transition_ms: u64,
    /// Pause before a full reset after losing the last heart
    pub hearts_reset_ms: u64,
    /// Pause before a full reset after the countdown runs out
    pub timeout_reset_ms: u64,
}

impl Default for SeasonSettings {
    fn default() -> Self {
        Self {
            level_count: LEVEL_COUNT,
            starting_hearts: START_HEARTS,
            time_budget_seconds: SEASON_TIME_SECONDS,
            invincibility_ms: INVINCIBILITY_MS,
            level_transition_ms: LEVEL_TRANSITION_MS,
            hearts_reset_ms: HEARTS_RESET_MS,
            timeout_reset_ms: TIMEOUT_RESET_MS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    pub season: SeasonSettings,
    /// Keyboard mapping onto movement intents
    pub bindings: KeyBindings,
}

impl Settings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "duck_season_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
