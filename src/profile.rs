//! Remote player profile mapping
//!
//! Profiles arrive as loosely typed JSON: XP and badge indices at the top
//! level, everything else as string key/value entries. They are validated
//! here, once, into `PlayerProgress`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rewards::{BadgeId, BadgeSet, PlayerProgress, PlayerProgressCounters};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("malformed profile payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile has no address")]
    MissingAddress,
    #[error("unknown badge index {0}")]
    UnknownBadge(u8),
    #[error("custom data {key:?} holds {value:?}, expected a whole number")]
    InvalidCounter { key: String, value: String },
}

/// One `customData` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDataEntry {
    pub key: String,
    #[serde(default)]
    pub value: Vec<String>,
}

/// Profile payload as the remote service sends it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub address: String,
    pub name: String,
    pub bio: String,
    pub pfp: String,
    pub project: String,
    pub xp: u64,
    pub achievements: Vec<u32>,
    /// Badge indices in catalog order
    pub badges: Vec<u8>,
    pub custom_data: Vec<CustomDataEntry>,
}

/// Counter names used in `customData`
const GAMES_PLAYED: &str = "gamesPlayed";
const GAMES_WON: &str = "gamesWon";
const CURRENT_WIN_STREAK: &str = "currentWinStreak";
const BEST_WIN_STREAK: &str = "bestWinStreak";
const HIGH_SCORE: &str = "highScore";
const CONSECUTIVE_DAYS: &str = "consecutiveDaysPlayed";
const TOURNAMENT_WINS: &str = "tournamentWins";
const PLAY_TIME: &str = "totalPlayTime";
const LAST_PLAYED_DAY: &str = "lastPlayedDay";

impl ProfileRecord {
    fn custom(&self, key: &str) -> Option<&str> {
        self.custom_data
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.value.first())
            .map(String::as_str)
    }

    fn counter<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, ProfileError> {
        match self.custom(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ProfileError::InvalidCounter {
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Write `progress` back into this record's XP, badges and custom data
    pub fn store(&mut self, progress: &PlayerProgress) {
        let c = &progress.counters;
        self.xp = c.total_xp;
        self.badges = progress.badges.iter().map(|b| b.index()).collect();

        let mut fields = vec![
            (GAMES_PLAYED, c.games_played.to_string()),
            (GAMES_WON, c.games_won.to_string()),
            (CURRENT_WIN_STREAK, c.current_win_streak.to_string()),
            (BEST_WIN_STREAK, c.best_win_streak.to_string()),
            (HIGH_SCORE, c.high_score.to_string()),
            (CONSECUTIVE_DAYS, c.consecutive_days_played.to_string()),
            (TOURNAMENT_WINS, c.tournament_wins.to_string()),
            (PLAY_TIME, c.total_play_time_minutes.to_string()),
        ];
        if let Some(day) = c.last_played_day {
            fields.push((LAST_PLAYED_DAY, day.to_string()));
        }

        for (key, value) in fields {
            match self.custom_data.iter_mut().find(|e| e.key == key) {
                Some(entry) => entry.value = vec![value],
                None => self.custom_data.push(CustomDataEntry {
                    key: key.to_string(),
                    value: vec![value],
                }),
            }
        }
    }
}

impl TryFrom<&ProfileRecord> for PlayerProgress {
    type Error = ProfileError;

    fn try_from(record: &ProfileRecord) -> Result<Self, Self::Error> {
        if record.address.trim().is_empty() {
            return Err(ProfileError::MissingAddress);
        }

        let badges = record
            .badges
            .iter()
            .map(|&i| BadgeId::from_index(i).ok_or(ProfileError::UnknownBadge(i)))
            .collect::<Result<BadgeSet, _>>()?;

        let counters = PlayerProgressCounters {
            total_xp: record.xp,
            games_played: record.counter(GAMES_PLAYED)?.unwrap_or_default(),
            games_won: record.counter(GAMES_WON)?.unwrap_or_default(),
            current_win_streak: record.counter(CURRENT_WIN_STREAK)?.unwrap_or_default(),
            best_win_streak: record.counter(BEST_WIN_STREAK)?.unwrap_or_default(),
            high_score: record.counter(HIGH_SCORE)?.unwrap_or_default(),
            consecutive_days_played: record.counter(CONSECUTIVE_DAYS)?.unwrap_or_default(),
            tournament_wins: record.counter(TOURNAMENT_WINS)?.unwrap_or_default(),
            total_play_time_minutes: record.counter(PLAY_TIME)?.unwrap_or_default(),
            last_played_day: record.counter(LAST_PLAYED_DAY)?,
        };

        Ok(Self { counters, badges })
    }
}

impl TryFrom<ProfileRecord> for PlayerProgress {
    type Error = ProfileError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        Self::try_from(&record)
    }
}

/// Parse and validate a profile payload
pub fn parse_profile(json: &str) -> Result<PlayerProgress, ProfileError> {
    let record: ProfileRecord = serde_json::from_str(json)?;
    let progress = PlayerProgress::try_from(&record)?;
    log::info!(
        "Profile {} loaded: {} XP, {} badges",
        record.address,
        progress.counters.total_xp,
        progress.badges.len()
    );
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "address": "Duck1111",
        "name": "mallard",
        "xp": 320,
        "badges": [0, 2],
        "customData": [
            { "key": "gamesPlayed", "value": ["12"] },
            { "key": "currentWinStreak", "value": ["3"] },
            { "key": "highScore", "value": ["10500"] },
            { "key": "favouriteColour", "value": ["teal"] }
        ]
    }"#;

    #[test]
    fn test_parse_profile() {
        let progress = parse_profile(PAYLOAD).unwrap();
        let c = &progress.counters;
        assert_eq!(c.total_xp, 320);
        assert_eq!(c.games_played, 12);
        assert_eq!(c.current_win_streak, 3);
        assert_eq!(c.high_score, 10_500);
        assert_eq!(c.tournament_wins, 0);
        assert_eq!(c.last_played_day, None);
        assert_eq!(
            progress.badges.iter().copied().collect::<Vec<_>>(),
            vec![BadgeId::FirstGame, BadgeId::HighScore]
        );
    }

    #[test]
    fn test_missing_address_rejected() {
        let err = parse_profile(r#"{ "xp": 10 }"#).unwrap_err();
        assert!(matches!(err, ProfileError::MissingAddress));
    }

    #[test]
    fn test_unknown_badge_rejected() {
        let err = parse_profile(r#"{ "address": "x", "badges": [7] }"#).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownBadge(7)));
    }

    #[test]
    fn test_bad_counter_rejected() {
        let json = r#"{ "address": "x",
            "customData": [{ "key": "gamesWon", "value": ["lots"] }] }"#;
        let err = parse_profile(json).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidCounter { ref key, .. } if key == "gamesWon"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_profile(r#"{ "xp": "many" }"#),
            Err(ProfileError::Json(_))
        ));
    }

    #[test]
    fn test_store_writes_back_and_keeps_unknown_entries() {
        let mut record: ProfileRecord = serde_json::from_str(PAYLOAD).unwrap();
        let mut progress = PlayerProgress::try_from(&record).unwrap();
        progress.counters.games_played = 13;
        progress.counters.last_played_day = Some(20_100);
        progress.badges.insert(BadgeId::WinStreak);

        record.store(&progress);
        assert_eq!(record.badges, vec![0, 1, 2]);
        assert!(record.custom_data.iter().any(|e| e.key == "favouriteColour"));
        assert_eq!(PlayerProgress::try_from(record).unwrap(), progress);
    }
}
