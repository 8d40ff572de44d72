//! Reward aggregation
//!
//! Pure functions from a session summary and the player's counters to XP,
//! badges, level-up and updated counters. Same inputs, same outputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::achievements::{AchievementLadder, LevelUpReward, PlayerLevel};
use super::badges::{BadgeCatalog, BadgeId};
use super::progress::{BadgeSet, PlayerProgressCounters};
use crate::sim::GameSessionSummary;

/// Runs at or under this many seconds earn the speed bonus
pub const SPEED_BONUS_SECONDS: u32 = 120;

/// XP paid per action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpTable {
    pub level_complete: u64,
    pub enemy_defeated: u64,
    pub collectible_found: u64,
    pub perfect_score: u64,
    pub speed_bonus: u64,
    pub no_damage: u64,
    pub daily_login: u64,
    pub tournament_win: u64,
}

impl Default for XpTable {
    fn default() -> Self {
        Self {
            level_complete: 50,
            enemy_defeated: 10,
            collectible_found: 5,
            perfect_score: 25,
            speed_bonus: 15,
            no_damage: 20,
            daily_login: 30,
            tournament_win: 200,
        }
    }
}

/// Why XP beyond the base was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusReason {
    PerfectScore,
    NoDamage,
    SpeedBonus,
    EnemiesDefeated(u32),
    CollectiblesFound(u32),
    DailyLogin { day: u32 },
    TournamentVictory,
    Badge(BadgeId),
}

impl fmt::Display for BonusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerfectScore => write!(f, "Perfect Score"),
            Self::NoDamage => write!(f, "No Damage Taken"),
            Self::SpeedBonus => write!(f, "Speed Bonus"),
            Self::EnemiesDefeated(n) => write!(f, "{} Enemies Defeated", n),
            Self::CollectiblesFound(n) => write!(f, "{} Collectibles Found", n),
            Self::DailyLogin { day } => write!(f, "Daily login (Day {})", day),
            Self::TournamentVictory => write!(f, "Tournament Victory"),
            Self::Badge(id) => write!(f, "Badge: {}", id.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpBreakdown {
    pub base_xp: u64,
    pub bonus_xp: u64,
    /// XP carried by newly earned badges
    pub badge_xp: u64,
    pub reasons: Vec<BonusReason>,
}

impl XpBreakdown {
    pub fn total(&self) -> u64 {
        self.base_xp + self.bonus_xp + self.badge_xp
    }
}

/// Everything one reward computation produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRewards {
    pub xp_awarded: u64,
    pub breakdown: XpBreakdown,
    pub new_counters: PlayerProgressCounters,
    pub badges_earned: Vec<BadgeId>,
    pub level_up: Option<LevelUpReward>,
    pub player_level: PlayerLevel,
    pub bonus_currency: u64,
    pub power_ups: u32,
}

/// Preview of what finishing a run could still pay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialRewards {
    pub min_xp: u64,
    pub max_xp: u64,
    /// Bonuses still within reach
    pub reachable: Vec<BonusReason>,
}

/// Ladder, badge catalog and XP table bundled for reward computation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardCalculator {
    pub ladder: AchievementLadder,
    pub badges: BadgeCatalog,
    pub xp: XpTable,
}

impl RewardCalculator {
    pub fn new(ladder: AchievementLadder, badges: BadgeCatalog, xp: XpTable) -> Self {
        Self { ladder, badges, xp }
    }

    /// Session XP before badges
    pub fn session_xp(&self, summary: &GameSessionSummary) -> XpBreakdown {
        let mut breakdown = XpBreakdown::default();
        if !summary.completed {
            return breakdown;
        }
        breakdown.base_xp = self.xp.level_complete;

        let mut bonus = |xp: u64, reason: BonusReason| {
            breakdown.bonus_xp += xp;
            breakdown.reasons.push(reason);
        };
        if !summary.took_damage {
            bonus(self.xp.perfect_score, BonusReason::PerfectScore);
            bonus(self.xp.no_damage, BonusReason::NoDamage);
        }
        if summary.within_time_limit && summary.elapsed_seconds <= SPEED_BONUS_SECONDS {
            bonus(self.xp.speed_bonus, BonusReason::SpeedBonus);
        }
        if summary.enemies_defeated > 0 {
            bonus(
                summary.enemies_defeated as u64 * self.xp.enemy_defeated,
                BonusReason::EnemiesDefeated(summary.enemies_defeated),
            );
        }
        if summary.collectibles_found > 0 {
            bonus(
                summary.collectibles_found as u64 * self.xp.collectible_found,
                BonusReason::CollectiblesFound(summary.collectibles_found),
            );
        }
        breakdown
    }

    /// Rewards for a finished season
    pub fn compute_season_rewards(
        &self,
        summary: &GameSessionSummary,
        counters: &PlayerProgressCounters,
        owned: &BadgeSet,
    ) -> GameRewards {
        let breakdown = self.session_xp(summary);

        let mut next = counters.clone();
        next.games_played += 1;
        if summary.completed {
            next.games_won += 1;
            next.current_win_streak += 1;
            next.best_win_streak = next.best_win_streak.max(next.current_win_streak);
        } else {
            next.current_win_streak = 0;
        }
        next.high_score = next.high_score.max(summary.final_score);
        next.total_play_time_minutes += (summary.elapsed_seconds / 60) as u64;
        next.total_xp += breakdown.base_xp + breakdown.bonus_xp;

        log::info!(
            "Season {:016x} rewards: {} base, {} bonus",
            summary.session_id,
            breakdown.base_xp,
            breakdown.bonus_xp
        );
        self.finish(counters.total_xp, next, owned, breakdown)
    }

    /// Rewards for logging in on day `today` (days since the Unix epoch)
    pub fn compute_daily_login_rewards(
        &self,
        counters: &PlayerProgressCounters,
        owned: &BadgeSet,
        today: u32,
    ) -> GameRewards {
        let days = match counters.last_played_day {
            // Already rewarded today (or the clock went backwards)
            Some(last) if last >= today => {
                return self.finish(counters.total_xp, counters.clone(), owned, XpBreakdown::default());
            }
            Some(last) if last + 1 == today => counters.consecutive_days_played + 1,
            _ => 1,
        };

        let mut next = counters.clone();
        next.consecutive_days_played = days;
        next.last_played_day = Some(today);
        next.total_xp += self.xp.daily_login;

        let breakdown = XpBreakdown {
            base_xp: self.xp.daily_login,
            reasons: vec![BonusReason::DailyLogin { day: days }],
            ..Default::default()
        };
        self.finish(counters.total_xp, next, owned, breakdown)
    }

    /// Rewards for a tournament victory
    pub fn compute_tournament_rewards(
        &self,
        counters: &PlayerProgressCounters,
        owned: &BadgeSet,
    ) -> GameRewards {
        let mut next = counters.clone();
        next.tournament_wins += 1;
        next.total_xp += self.xp.tournament_win;

        let breakdown = XpBreakdown {
            base_xp: self.xp.tournament_win,
            reasons: vec![BonusReason::TournamentVictory],
            ..Default::default()
        };
        self.finish(counters.total_xp, next, owned, breakdown)
    }

    /// XP range completing the run described by `summary` could still pay
    pub fn potential_rewards(&self, summary: &GameSessionSummary) -> PotentialRewards {
        let min_xp = self.xp.level_complete
            + summary.collectibles_found as u64 * self.xp.collectible_found
            + summary.enemies_defeated as u64 * self.xp.enemy_defeated;
        let mut max_xp = min_xp;
        let mut reachable = Vec::new();

        if !summary.took_damage {
            max_xp += self.xp.perfect_score + self.xp.no_damage;
            reachable.push(BonusReason::PerfectScore);
            reachable.push(BonusReason::NoDamage);
        }
        if summary.within_time_limit && summary.elapsed_seconds <= SPEED_BONUS_SECONDS {
            max_xp += self.xp.speed_bonus;
            reachable.push(BonusReason::SpeedBonus);
        }

        PotentialRewards {
            min_xp,
            max_xp,
            reachable,
        }
    }

    /// Apply badges to the updated counters and work out the level change
    fn finish(
        &self,
        previous_xp: u64,
        mut counters: PlayerProgressCounters,
        owned: &BadgeSet,
        mut breakdown: XpBreakdown,
    ) -> GameRewards {
        let earned = self.badges.newly_earned(&counters, owned);

        let mut bonus_currency = 0;
        let mut power_ups = 0;
        for badge in &earned {
            breakdown.badge_xp += badge.reward.xp;
            breakdown.reasons.push(BonusReason::Badge(badge.id));
            bonus_currency += badge.reward.bonus_currency;
            power_ups += badge.reward.power_ups;
            log::info!("Badge earned: {}", badge.name);
        }
        counters.total_xp += breakdown.badge_xp;

        let xp_awarded = breakdown.total();
        let award = self.ladder.award_xp(previous_xp, xp_awarded);

        GameRewards {
            xp_awarded,
            breakdown,
            new_counters: counters,
            badges_earned: earned.iter().map(|b| b.id).collect(),
            level_up: award.level_up,
            player_level: award.player_level,
            bonus_currency,
            power_ups,
        }
    }
}
