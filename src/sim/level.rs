//! Level geometry store
//!
//! Layouts are immutable once loaded. Malformed data is rejected when the
//! catalog is built, never at runtime.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rect::Rect;
use crate::settings::PhysicsSettings;

/// Built-in season layouts
const BUILTIN_LEVELS: &str = include_str!("levels.json");

/// Reasons a level layout is rejected at load time
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected {expected} levels, found {found}")]
    Count { expected: u32, found: usize },
    #[error("level in slot {slot} is numbered {found}")]
    Index { slot: u32, found: u32 },
    #[error("level {level}: {what} has a non-positive or non-finite size")]
    Degenerate { level: u32, what: String },
    #[error("level {level}: {what} lies outside the level bounds")]
    OutOfBounds { level: u32, what: String },
    #[error("level {level}: spike {spike} overlaps block {block}")]
    SpikeInsideBlock { level: u32, spike: usize, block: usize },
    #[error("level {level}: player spawn overlaps {what}")]
    SpawnBlocked { level: u32, what: String },
    #[error("level {0} is missing from the level source")]
    Missing(u32),
}

/// Static layout of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// 1-based position in the season
    pub index: u32,
    #[serde(default)]
    pub name: String,
    /// Player center at level start
    #[serde(rename = "spawn")]
    pub player_spawn: Vec2,
    /// Static solid geometry
    pub blocks: Vec<Rect>,
    pub key: Rect,
    pub door: Rect,
    #[serde(default)]
    pub spikes: Vec<Rect>,
}

impl LevelLayout {
    /// Check the layout against the level bounds and player size
    pub fn validate(&self, physics: &PhysicsSettings) -> Result<(), LevelError> {
        let level = self.index;
        let bounds = Rect::new(0.0, 0.0, physics.level_width, physics.level_height);

        let named = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, r)| (format!("block {i}"), r))
            .chain(
                self.spikes
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (format!("spike {i}"), r)),
            )
            .chain([("key".to_string(), &self.key), ("door".to_string(), &self.door)]);

        for (what, rect) in named {
            if !rect.is_well_formed() {
                return Err(LevelError::Degenerate { level, what });
            }
            if !bounds.contains_rect(rect) {
                return Err(LevelError::OutOfBounds { level, what });
            }
        }

        for (spike_idx, spike) in self.spikes.iter().enumerate() {
            if let Some(block_idx) = self.blocks.iter().position(|b| b.overlaps(spike)) {
                return Err(LevelError::SpikeInsideBlock {
                    level,
                    spike: spike_idx,
                    block: block_idx,
                });
            }
        }

        let spawn_box = Rect::from_center(
            self.player_spawn,
            physics.player_width,
            physics.player_height,
        );
        if !self.player_spawn.is_finite() {
            return Err(LevelError::OutOfBounds {
                level,
                what: "player spawn".to_string(),
            });
        }
        if let Some(i) = self.blocks.iter().position(|b| b.overlaps(&spawn_box)) {
            return Err(LevelError::SpawnBlocked {
                level,
                what: format!("block {i}"),
            });
        }
        if let Some(i) = self.spikes.iter().position(|s| s.overlaps(&spawn_box)) {
            return Err(LevelError::SpawnBlocked {
                level,
                what: format!("spike {i}"),
            });
        }

        Ok(())
    }
}

/// Read-only lookup of layouts by 1-based index
pub trait LevelSource {
    /// Layout for `index`, if the source has one
    fn level(&self, index: u32) -> Option<&LevelLayout>;
    /// Number of levels the source can supply
    fn level_count(&self) -> u32;
}

#[derive(Deserialize)]
struct CatalogFile {
    levels: Vec<LevelLayout>,
}

/// Validated, ordered set of level layouts
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelLayout>,
}

impl LevelCatalog {
    /// The five built-in season levels
    pub fn builtin(physics: &PhysicsSettings) -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS, physics, crate::consts::LEVEL_COUNT)
    }

    /// Parse and validate a catalog from JSON
    pub fn from_json(
        json: &str,
        physics: &PhysicsSettings,
        expected: u32,
    ) -> Result<Self, LevelError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        if file.levels.len() != expected as usize {
            return Err(LevelError::Count {
                expected,
                found: file.levels.len(),
            });
        }
        Self::new(file.levels, physics)
    }

    /// Build a catalog from layouts already in memory
    pub fn new(levels: Vec<LevelLayout>, physics: &PhysicsSettings) -> Result<Self, LevelError> {
        for (slot, layout) in (1u32..).zip(&levels) {
            if layout.index != slot {
                return Err(LevelError::Index {
                    slot,
                    found: layout.index,
                });
            }
            layout.validate(physics)?;
        }
        log::info!("Loaded {} levels", levels.len());
        Ok(Self { levels })
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelLayout> {
        self.levels.iter()
    }
}

impl LevelSource for LevelCatalog {
    fn level(&self, index: u32) -> Option<&LevelLayout> {
        let slot = index.checked_sub(1)? as usize;
        self.levels.get(slot)
    }

    fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LevelLayout {
        LevelLayout {
            index: 1,
            name: "test".to_string(),
            player_spawn: Vec2::new(100.0, 576.0),
            blocks: vec![Rect::new(0.0, 640.0, 768.0, 128.0)],
            key: Rect::new(660.0, 200.0, 48.0, 48.0),
            door: Rect::new(64.0, 86.0, 98.0, 94.0),
            spikes: vec![Rect::new(400.0, 600.0, 40.0, 40.0)],
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = LevelCatalog::builtin(&PhysicsSettings::default()).unwrap();
        assert_eq!(catalog.level_count(), 5);
        for (i, level) in catalog.iter().enumerate() {
            assert_eq!(level.index, i as u32 + 1);
        }
        assert!(catalog.level(0).is_none());
        assert!(catalog.level(6).is_none());
        assert_eq!(catalog.level(1).unwrap().player_spawn, Vec2::new(100.0, 576.0));
    }

    #[test]
    fn test_valid_layout_passes() {
        assert!(layout().validate(&PhysicsSettings::default()).is_ok());
    }

    #[test]
    fn test_spike_inside_block_rejected() {
        let mut level = layout();
        level.spikes.push(Rect::new(10.0, 630.0, 40.0, 40.0));
        let err = level.validate(&PhysicsSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::SpikeInsideBlock { spike: 1, block: 0, .. }
        ));
    }

    #[test]
    fn test_spawn_inside_block_rejected() {
        let mut level = layout();
        level.player_spawn = Vec2::new(100.0, 650.0);
        let err = level.validate(&PhysicsSettings::default()).unwrap_err();
        assert!(matches!(err, LevelError::SpawnBlocked { .. }));
    }

    #[test]
    fn test_degenerate_and_out_of_bounds_rejected() {
        let mut level = layout();
        level.key = Rect::new(10.0, 10.0, 0.0, 48.0);
        assert!(matches!(
            level.validate(&PhysicsSettings::default()),
            Err(LevelError::Degenerate { .. })
        ));

        let mut level = layout();
        level.door = Rect::new(740.0, 86.0, 98.0, 94.0);
        assert!(matches!(
            level.validate(&PhysicsSettings::default()),
            Err(LevelError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_missing_door_fails_to_parse() {
        let json = r#"{ "levels": [ {
            "index": 1, "spawn": [100.0, 576.0], "blocks": [],
            "key": { "x": 1, "y": 1, "width": 4, "height": 4 }
        } ] }"#;
        let err = LevelCatalog::from_json(json, &PhysicsSettings::default(), 1).unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn test_wrong_count_and_order_rejected() {
        let physics = PhysicsSettings::default();
        let err = LevelCatalog::from_json(r#"{ "levels": [] }"#, &physics, 5).unwrap_err();
        assert!(matches!(err, LevelError::Count { expected: 5, found: 0 }));

        let mut second = layout();
        second.index = 3;
        let err = LevelCatalog::new(vec![layout(), second], &physics).unwrap_err();
        assert!(matches!(err, LevelError::Index { slot: 2, found: 3 }));
    }
}
