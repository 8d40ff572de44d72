//! Achievement, badge and reward calculation
//!
//! Client-side reward rules. Everything here is pure: callers pass the
//! player's current counters in and persist the counters handed back.

pub mod achievements;
pub mod badges;
pub mod calculator;
pub mod progress;

pub use achievements::{
    ACHIEVEMENT_LEVELS, AchievementLadder, AchievementLevel, LevelUpReward, PlayerLevel,
    TimeToNextLevel, XpAward,
};
pub use badges::{
    BadgeCatalog, BadgeCondition, BadgeDefinition, BadgeId, BadgeProgress, BadgeReward,
    BadgeStats, GAME_BADGES, Rarity,
};
pub use calculator::{
    BonusReason, GameRewards, PotentialRewards, RewardCalculator, SPEED_BONUS_SECONDS, XpBreakdown,
    XpTable,
};
pub use progress::{BadgeSet, PlayerProgress, PlayerProgressCounters};
