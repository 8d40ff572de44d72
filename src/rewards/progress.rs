//! Player progress record
//!
//! Counters the reward calculator reads and returns updated. The caller owns
//! persistence; on the web the record is kept in LocalStorage.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::badges::BadgeId;

/// Badges a player owns, in catalog order
pub type BadgeSet = BTreeSet<BadgeId>;

/// Lifetime counters of one player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProgressCounters {
    pub total_xp: u64,
    pub games_played: u32,
    pub games_won: u32,
    pub current_win_streak: u32,
    pub best_win_streak: u32,
    pub high_score: u64,
    pub consecutive_days_played: u32,
    pub tournament_wins: u32,
    pub total_play_time_minutes: u64,
    /// Day number (days since the Unix epoch) of the last daily login
    pub last_played_day: Option<u32>,
}

/// Counters plus owned badges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProgress {
    pub counters: PlayerProgressCounters,
    pub badges: BadgeSet,
}

impl PlayerProgress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "duck_season_progress";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_badge(&self, id: BadgeId) -> bool {
        self.badges.contains(&id)
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<PlayerProgress>(&json) {
                    Ok(progress) => {
                        log::info!(
                            "Loaded progress: {} XP, {} badges",
                            progress.counters.total_xp,
                            progress.badges.len()
                        );
                        return progress;
                    }
                    Err(e) => log::warn!("Ignoring unreadable progress: {}", e),
                }
            }
        }

        log::info!("No saved progress, starting fresh");
        Self::new()
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Progress saved ({} XP)", self.counters.total_xp);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let progress: PlayerProgress =
            serde_json::from_str(r#"{ "counters": { "total_xp": 120 } }"#).unwrap();
        assert_eq!(progress.counters.total_xp, 120);
        assert_eq!(progress.counters.last_played_day, None);
        assert!(progress.badges.is_empty());
    }

    #[test]
    fn test_badges_serialize_by_id() {
        let mut progress = PlayerProgress::new();
        progress.badges.insert(BadgeId::WinStreak);
        progress.badges.insert(BadgeId::FirstGame);
        let json = serde_json::to_string(&progress).unwrap();
        assert!(json.contains(r#""badges":["first_game","win_streak"]"#));
        assert!(progress.has_badge(BadgeId::FirstGame));
        assert!(!progress.has_badge(BadgeId::HighScore));
    }
}
