//! XP leveling curve
//!
//! Six titled levels with strictly increasing XP thresholds. A player's level
//! is the highest one whose threshold their total XP reaches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One rung of the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementLevel {
    pub level: u32,
    pub xp_required: u64,
    pub title: &'static str,
    /// Cosmetic perk granted on reaching this level
    pub special_reward: Option<&'static str>,
}

pub const ACHIEVEMENT_LEVELS: [AchievementLevel; 6] = [
    AchievementLevel {
        level: 1,
        xp_required: 0,
        title: "Duckling",
        special_reward: None,
    },
    AchievementLevel {
        level: 2,
        xp_required: 100,
        title: "Young Duck",
        special_reward: Some("Bonus XP Multiplier"),
    },
    AchievementLevel {
        level: 3,
        xp_required: 250,
        title: "Duck",
        special_reward: Some("Achievement Hunter"),
    },
    AchievementLevel {
        level: 4,
        xp_required: 500,
        title: "Expert Duck",
        special_reward: Some("Elite Player Status"),
    },
    AchievementLevel {
        level: 5,
        xp_required: 1000,
        title: "Duck Master",
        special_reward: Some("Golden Badge Collection"),
    },
    AchievementLevel {
        level: 6,
        xp_required: 2000,
        title: "Duck Legend",
        special_reward: Some("Legendary Champion Status"),
    },
];

/// Where a player stands on the ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLevel {
    pub level: u32,
    pub title: String,
    pub total_xp: u64,
    /// XP still missing for the next level (0 at max level)
    pub xp_to_next_level: u64,
    /// Width of the current level band (0 at max level)
    pub xp_for_level: u64,
    /// Fraction of the current band covered, in [0, 1]; 1 at max level
    pub progress: f32,
}

/// Reached a new level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpReward {
    pub level: u32,
    pub title: String,
    pub special_reward: Option<String>,
}

/// Result of adding XP to a total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpAward {
    pub new_total: u64,
    pub player_level: PlayerLevel,
    pub level_up: Option<LevelUpReward>,
}

/// Rough wait until the next level at a given daily XP rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeToNextLevel {
    MaxLevel,
    /// No XP rate to extrapolate from
    Unknown,
    LessThanADay,
    Days(u64),
    Weeks(u64),
}

impl fmt::Display for TimeToNextLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxLevel => write!(f, "Max level reached!"),
            Self::Unknown => write!(f, "Play more to estimate"),
            Self::LessThanADay => write!(f, "Less than 1 day"),
            Self::Days(n) => write!(f, "About {} days", n),
            Self::Weeks(1) => write!(f, "About 1 week"),
            Self::Weeks(n) => write!(f, "About {} weeks", n),
        }
    }
}

/// The leveling curve
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementLadder {
    levels: Vec<AchievementLevel>,
}

impl Default for AchievementLadder {
    fn default() -> Self {
        Self {
            levels: ACHIEVEMENT_LEVELS.to_vec(),
        }
    }
}

impl AchievementLadder {
    /// Custom ladder; thresholds must start at 0 and strictly increase
    pub fn new(levels: Vec<AchievementLevel>) -> Option<Self> {
        let starts_at_zero = levels.first().is_some_and(|l| l.xp_required == 0);
        let increasing = levels.windows(2).all(|w| w[0].xp_required < w[1].xp_required);
        (starts_at_zero && increasing).then_some(Self { levels })
    }

    pub fn levels(&self) -> &[AchievementLevel] {
        &self.levels
    }

    pub fn max_level(&self) -> u32 {
        self.levels.last().map_or(1, |l| l.level)
    }

    /// Level reached with `total_xp`
    pub fn calculate_level(&self, total_xp: u64) -> PlayerLevel {
        let reached = self
            .levels
            .iter()
            .take_while(|l| total_xp >= l.xp_required)
            .count()
            .max(1);
        let current = &self.levels[reached - 1];

        let (xp_to_next_level, xp_for_level, progress) = match self.levels.get(reached) {
            Some(next) => {
                let band = next.xp_required - current.xp_required;
                let gained = total_xp - current.xp_required;
                let progress = (gained as f32 / band as f32).clamp(0.0, 1.0);
                (next.xp_required - total_xp, band, progress)
            }
            None => (0, 0, 1.0),
        };

        PlayerLevel {
            level: current.level,
            title: current.title.to_string(),
            total_xp,
            xp_to_next_level,
            xp_for_level,
            progress,
        }
    }

    pub fn is_max_level(&self, player: &PlayerLevel) -> bool {
        player.level >= self.max_level()
    }

    /// Level-up reward when `new_xp` lands on a higher level than `previous_xp`
    pub fn check_level_up(&self, previous_xp: u64, new_xp: u64) -> Option<LevelUpReward> {
        let before = self.calculate_level(previous_xp);
        let after = self.calculate_level(new_xp);
        if after.level <= before.level {
            return None;
        }
        let special_reward = self
            .levels
            .iter()
            .find(|l| l.level == after.level)
            .and_then(|l| l.special_reward)
            .map(str::to_string);
        log::info!("Level up: {} ({})", after.level, after.title);
        Some(LevelUpReward {
            level: after.level,
            title: after.title,
            special_reward,
        })
    }

    /// Add `amount` to `current_xp`
    pub fn award_xp(&self, current_xp: u64, amount: u64) -> XpAward {
        let new_total = current_xp.saturating_add(amount);
        XpAward {
            new_total,
            player_level: self.calculate_level(new_total),
            level_up: self.check_level_up(current_xp, new_total),
        }
    }

    pub fn estimated_time_to_next_level(&self, total_xp: u64, xp_per_day: f64) -> TimeToNextLevel {
        let player = self.calculate_level(total_xp);
        if self.is_max_level(&player) {
            return TimeToNextLevel::MaxLevel;
        }
        if xp_per_day.is_nan() || xp_per_day <= 0.0 {
            return TimeToNextLevel::Unknown;
        }

        let days = (player.xp_to_next_level as f64 / xp_per_day).ceil() as u64;
        match days {
            0 | 1 => TimeToNextLevel::LessThanADay,
            2..=6 => TimeToNextLevel::Days(days),
            _ => TimeToNextLevel::Weeks(days.div_ceil(7)),
        }
    }
}
