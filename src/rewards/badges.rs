//! Badge catalog and condition evaluation

use serde::{Deserialize, Serialize};

use super::progress::{BadgeSet, PlayerProgressCounters};

/// Stable badge identifiers, ordered as in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    FirstGame,
    WinStreak,
    HighScore,
    DailyPlayer,
    TournamentWinner,
}

impl BadgeId {
    pub const ALL: [BadgeId; 5] = [
        Self::FirstGame,
        Self::WinStreak,
        Self::HighScore,
        Self::DailyPlayer,
        Self::TournamentWinner,
    ];

    /// Position in the remote profile's badge list
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstGame => "first_game",
            Self::WinStreak => "win_streak",
            Self::HighScore => "high_score",
            Self::DailyPlayer => "daily_player",
            Self::TournamentWinner => "tournament_winner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Which counter a badge watches, and the bar it must reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeCondition {
    /// At least one game played
    FirstTime,
    Streak { wins: u32 },
    Threshold { score: u64 },
    Daily { consecutive_days: u32 },
    /// Tournament victory
    Special,
}

impl BadgeCondition {
    /// (current, required) progress toward the condition
    pub fn progress(&self, counters: &PlayerProgressCounters) -> (u64, u64) {
        match *self {
            Self::FirstTime => (counters.games_played.min(1) as u64, 1),
            Self::Streak { wins } => (counters.current_win_streak as u64, wins.max(1) as u64),
            Self::Threshold { score } => (counters.high_score, score.max(1)),
            Self::Daily { consecutive_days } => (
                counters.consecutive_days_played as u64,
                consecutive_days.max(1) as u64,
            ),
            Self::Special => (counters.tournament_wins as u64, 1),
        }
    }

    pub fn is_met(&self, counters: &PlayerProgressCounters) -> bool {
        let (current, required) = self.progress(counters);
        current >= required
    }
}

/// Extras granted with a badge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeReward {
    pub bonus_currency: u64,
    pub power_ups: u32,
    pub xp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeDefinition {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub condition: BadgeCondition,
    pub reward: BadgeReward,
}

pub const GAME_BADGES: [BadgeDefinition; 5] = [
    BadgeDefinition {
        id: BadgeId::FirstGame,
        name: "First Flight",
        description: "Play your first game",
        rarity: Rarity::Common,
        condition: BadgeCondition::FirstTime,
        reward: BadgeReward {
            bonus_currency: 50,
            power_ups: 0,
            xp: 25,
        },
    },
    BadgeDefinition {
        id: BadgeId::WinStreak,
        name: "Hot Streak",
        description: "Win 5 games in a row",
        rarity: Rarity::Rare,
        condition: BadgeCondition::Streak { wins: 5 },
        reward: BadgeReward {
            bonus_currency: 150,
            power_ups: 1,
            xp: 75,
        },
    },
    BadgeDefinition {
        id: BadgeId::HighScore,
        name: "High Flyer",
        description: "Reach a score of 10,000 points",
        rarity: Rarity::Epic,
        condition: BadgeCondition::Threshold { score: 10_000 },
        reward: BadgeReward {
            bonus_currency: 200,
            power_ups: 2,
            xp: 100,
        },
    },
    BadgeDefinition {
        id: BadgeId::DailyPlayer,
        name: "Daily Duck",
        description: "Play every day for a week",
        rarity: Rarity::Rare,
        condition: BadgeCondition::Daily {
            consecutive_days: 7,
        },
        reward: BadgeReward {
            bonus_currency: 300,
            power_ups: 3,
            xp: 150,
        },
    },
    BadgeDefinition {
        id: BadgeId::TournamentWinner,
        name: "Tournament Champion",
        description: "Win a tournament",
        rarity: Rarity::Legendary,
        condition: BadgeCondition::Special,
        reward: BadgeReward {
            bonus_currency: 500,
            power_ups: 5,
            xp: 250,
        },
    },
];

/// Per-badge progress for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeProgress {
    pub id: BadgeId,
    pub name: &'static str,
    pub current: u64,
    pub required: u64,
    pub percentage: f32,
    pub earned: bool,
    /// Condition holds but the badge is not owned yet
    pub can_earn: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeStats {
    pub total: usize,
    pub earned: usize,
    pub completion_percentage: f32,
}

/// The badge catalog
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeCatalog {
    badges: Vec<BadgeDefinition>,
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self {
            badges: GAME_BADGES.to_vec(),
        }
    }
}

impl BadgeCatalog {
    pub fn new(badges: Vec<BadgeDefinition>) -> Self {
        Self { badges }
    }

    pub fn all(&self) -> &[BadgeDefinition] {
        &self.badges
    }

    pub fn get(&self, id: BadgeId) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn by_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &BadgeDefinition> {
        self.badges.iter().filter(move |b| b.rarity == rarity)
    }

    /// Badges not in `owned` whose condition holds, in catalog order
    pub fn newly_earned(
        &self,
        counters: &PlayerProgressCounters,
        owned: &BadgeSet,
    ) -> Vec<&BadgeDefinition> {
        self.badges
            .iter()
            .filter(|b| !owned.contains(&b.id) && b.condition.is_met(counters))
            .collect()
    }

    pub fn progress(&self, counters: &PlayerProgressCounters, owned: &BadgeSet) -> Vec<BadgeProgress> {
        self.badges
            .iter()
            .map(|b| {
                let (current, required) = b.condition.progress(counters);
                let earned = owned.contains(&b.id);
                BadgeProgress {
                    id: b.id,
                    name: b.name,
                    current,
                    required,
                    percentage: current as f32 / required as f32 * 100.0,
                    earned,
                    can_earn: !earned && current >= required,
                }
            })
            .collect()
    }

    pub fn stats(&self, owned: &BadgeSet) -> BadgeStats {
        let total = self.badges.len();
        let earned = self.badges.iter().filter(|b| owned.contains(&b.id)).count();
        let completion_percentage = if total > 0 {
            earned as f32 / total as f32 * 100.0
        } else {
            0.0
        };
        BadgeStats {
            total,
            earned,
            completion_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mapping() {
        for (i, id) in BadgeId::ALL.iter().enumerate() {
            assert_eq!(id.index() as usize, i);
            assert_eq!(BadgeId::from_index(i as u8), Some(*id));
        }
        assert_eq!(BadgeId::from_index(5), None);
        assert_eq!(BadgeId::TournamentWinner.as_str(), "tournament_winner");
    }

    #[test]
    fn test_conditions() {
        let mut counters = PlayerProgressCounters::default();
        assert!(!BadgeCondition::FirstTime.is_met(&counters));
        counters.games_played = 1;
        assert!(BadgeCondition::FirstTime.is_met(&counters));

        counters.current_win_streak = 4;
        assert!(!BadgeCondition::Streak { wins: 5 }.is_met(&counters));
        counters.current_win_streak = 5;
        assert!(BadgeCondition::Streak { wins: 5 }.is_met(&counters));

        counters.high_score = 10_000;
        assert!(BadgeCondition::Threshold { score: 10_000 }.is_met(&counters));
    }

    #[test]
    fn test_newly_earned_skips_owned() {
        let catalog = BadgeCatalog::default();
        let counters = PlayerProgressCounters {
            games_played: 3,
            tournament_wins: 1,
            ..Default::default()
        };
        let mut owned = BadgeSet::new();
        let ids: Vec<_> = catalog.newly_earned(&counters, &owned).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![BadgeId::FirstGame, BadgeId::TournamentWinner]);

        owned.insert(BadgeId::FirstGame);
        let ids: Vec<_> = catalog.newly_earned(&counters, &owned).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![BadgeId::TournamentWinner]);
    }

    #[test]
    fn test_progress_and_stats() {
        let catalog = BadgeCatalog::default();
        let counters = PlayerProgressCounters {
            games_played: 1,
            consecutive_days_played: 3,
            high_score: 2_500,
            ..Default::default()
        };
        let owned: BadgeSet = [BadgeId::FirstGame].into();

        let progress = catalog.progress(&counters, &owned);
        let first = &progress[0];
        assert!(first.earned && !first.can_earn);
        let high = &progress[2];
        assert_eq!((high.current, high.required), (2_500, 10_000));
        assert!((high.percentage - 25.0).abs() < 0.001);
        let daily = &progress[3];
        assert_eq!((daily.current, daily.required), (3, 7));

        let stats = catalog.stats(&owned);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.earned, 1);
        assert!((stats.completion_percentage - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_by_rarity() {
        let catalog = BadgeCatalog::default();
        let rare: Vec<_> = catalog.by_rarity(Rarity::Rare).map(|b| b.id).collect();
        assert_eq!(rare, vec![BadgeId::WinStreak, BadgeId::DailyPlayer]);
        assert_eq!(catalog.by_rarity(Rarity::Legendary).count(), 1);
    }
}
