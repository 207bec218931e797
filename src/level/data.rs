use super::grid::{BlockGrid, BlockKind};
use crate::collision::Rect;
use crate::color::Color;
use crate::entity::{ButtonMode, TILE_SIZE};
use crate::item::SavedItem;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Largest width or height, in tiles, a level may declare
pub const MAX_LEVEL_SIDE: usize = 4096;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read level: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse level: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid level: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("unknown level '{0}'")]
    Unknown(String),
}

fn one() -> u32 {
    1
}

fn default_vault_slots() -> usize {
    27
}

/// Player spawn in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPlacement {
    pub x: i32,
    pub y: i32,
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPlacement {
    pub x: i32,
    pub y: i32,
    pub item_id: String,
    #[serde(default = "one")]
    pub stack_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobPlacement {
    pub x: i32,
    pub y: i32,
    pub mob_id: String,
}

/// A point light, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub intensity: f32,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallaxLayer {
    pub texture: String,
    /// 0.0 is fixed to the screen, 1.0 moves with the world
    pub scroll_factor: f32,
    #[serde(default)]
    pub y_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorPlacement {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonPlacement {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<u32>,
    #[serde(default)]
    pub mode: ButtonMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPlacement {
    pub x: i32,
    pub y: i32,
    /// Persistent vaults share the save file's vault instead of `items`
    #[serde(default)]
    pub persistent: bool,
    #[serde(default = "default_vault_slots")]
    pub max_slots: usize,
    #[serde(default)]
    pub items: Vec<SavedItem>,
}

/// A level as stored on disk.
///
/// Block and entity positions are tile coordinates; the spawn, lights and exit
/// are in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub id: String,
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub spawn: SpawnPoint,
    #[serde(default)]
    pub blocks: Vec<BlockPlacement>,
    #[serde(default)]
    pub items: Vec<ItemPlacement>,
    #[serde(default)]
    pub mobs: Vec<MobPlacement>,
    #[serde(default)]
    pub lights: Vec<LightSource>,
    #[serde(default)]
    pub parallax: Vec<ParallaxLayer>,
    #[serde(default)]
    pub doors: Vec<DoorPlacement>,
    #[serde(default)]
    pub buttons: Vec<ButtonPlacement>,
    #[serde(default)]
    pub vaults: Vec<VaultPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
}

impl LevelData {
    /// An empty level with a stone floor along the bottom row
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: usize, height: usize) -> Self {
        let floor_y = height.saturating_sub(1) as i32;
        LevelData {
            id: id.into(),
            name: name.into(),
            width,
            height,
            spawn: SpawnPoint {
                x: TILE_SIZE,
                y: (floor_y as f32 - 2.0).max(0.0) * TILE_SIZE,
            },
            blocks: (0..width as i32)
                .map(|x| BlockPlacement {
                    x,
                    y: floor_y,
                    kind: BlockKind::Stone,
                })
                .collect(),
            items: Vec::new(),
            mobs: Vec::new(),
            lights: Vec::new(),
            parallax: Vec::new(),
            doors: Vec::new(),
            buttons: Vec::new(),
            vaults: Vec::new(),
            exit: None,
            requires: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes the level, creating parent directories as needed
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        log::info!("Wrote level '{}' to {}", self.id, path.display());
        Ok(())
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    fn tile_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Checks the level for problems that would break loading or play
    ///
    /// Collects every problem instead of stopping at the first one.
    pub fn validate(&self) -> Result<(), LevelError> {
        let mut problems = Vec::new();

        if self.id.trim().is_empty() {
            problems.push("level id is empty".to_string());
        }
        if self.width == 0 || self.height == 0 {
            problems.push(format!("level size {}x{} is empty", self.width, self.height));
        } else if self.width > MAX_LEVEL_SIDE || self.height > MAX_LEVEL_SIDE {
            problems.push(format!(
                "level size {}x{} is larger than {} tiles per side",
                self.width, self.height, MAX_LEVEL_SIDE
            ));
        }

        let mut seen = HashSet::new();
        for block in &self.blocks {
            if !self.tile_in_bounds(block.x, block.y) {
                problems.push(format!("block at ({}, {}) is outside the level", block.x, block.y));
            } else if !seen.insert((block.x, block.y)) {
                problems.push(format!("duplicate block at ({}, {})", block.x, block.y));
            }
        }

        let entities = self
            .items
            .iter()
            .map(|p| ("item", p.x, p.y))
            .chain(self.mobs.iter().map(|p| ("mob", p.x, p.y)))
            .chain(self.doors.iter().map(|p| ("door", p.x, p.y)))
            .chain(self.buttons.iter().map(|p| ("button", p.x, p.y)))
            .chain(self.vaults.iter().map(|p| ("vault", p.x, p.y)));
        for (kind, x, y) in entities {
            if !self.tile_in_bounds(x, y) {
                problems.push(format!("{} at ({}, {}) is outside the level", kind, x, y));
            }
        }

        let bounds = Rect::new(0.0, 0.0, self.pixel_width(), self.pixel_height());
        if !bounds.contains_point(self.spawn.x, self.spawn.y) {
            problems.push(format!(
                "spawn ({}, {}) is outside the level",
                self.spawn.x, self.spawn.y
            ));
        }

        if self.requires.as_deref() == Some(self.id.as_str()) {
            problems.push("level requires itself".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(LevelError::Invalid(problems))
        }
    }

    /// Builds the block grid, dropping blocks that fall outside the level
    pub fn build_grid(&self) -> BlockGrid {
        let mut grid = BlockGrid::new(self.width, self.height);
        for block in &self.blocks {
            if !grid.set(block.x, block.y, block.kind) {
                log::warn!(
                    "Level '{}': dropping block outside the grid at ({}, {})",
                    self.id,
                    block.x,
                    block.y
                );
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "id": "cave",
        "name": "Cave",
        "width": 10,
        "height": 6,
        "spawn": {"x": 40, "y": 64},
        "blocks": [{"x": 0, "y": 5, "kind": "stone"}, {"x": 1, "y": 5, "kind": "spikes"}],
        "items": [{"x": 3, "y": 4, "itemId": "sapphire"}],
        "buttons": [{"x": 5, "y": 4, "linkId": 1, "mode": {"type": "toggle"}}],
        "vaults": [{"x": 6, "y": 4, "persistent": true}]
    }"#;

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let level = LevelData::from_json(MINIMAL).unwrap();
        assert_eq!(level.blocks.len(), 2);
        assert_eq!(level.items[0].stack_count, 1);
        assert!(level.mobs.is_empty());
        assert!(level.lights.is_empty());
        assert!(level.parallax.is_empty());
        assert_eq!(level.buttons[0].mode, ButtonMode::Toggle);
        assert_eq!(level.vaults[0].max_slots, 27);
        assert!(level.exit.is_none());
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let mut level = LevelData::new("demo", "Demo", 4, 4);
        level.items.push(ItemPlacement {
            x: 1,
            y: 1,
            item_id: "gold_coin".to_string(),
            stack_count: 3,
        });
        level.parallax.push(ParallaxLayer {
            texture: "hills".to_string(),
            scroll_factor: 0.5,
            y_offset: 12.0,
        });

        let json = level.to_json_pretty().unwrap();
        assert!(json.contains("\"itemId\""));
        assert!(json.contains("\"stackCount\""));
        assert!(json.contains("\"scrollFactor\""));
        assert!(!json.contains("\"requires\""));
        assert_eq!(LevelData::from_json(&json).unwrap(), level);
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let mut level = LevelData::new("broken", "Broken", 4, 4);
        level.blocks.push(BlockPlacement {
            x: 0,
            y: 3,
            kind: BlockKind::Dirt,
        });
        level.blocks.push(BlockPlacement {
            x: 9,
            y: 0,
            kind: BlockKind::Dirt,
        });
        level.spawn = SpawnPoint { x: -5.0, y: 0.0 };

        match level.validate() {
            Err(LevelError::Invalid(problems)) => {
                assert_eq!(problems.len(), 3);
                assert!(problems.iter().any(|p| p.contains("duplicate")));
            }
            other => panic!("expected invalid level, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_oversized_levels() {
        let level = LevelData::new("vast", "Vast", MAX_LEVEL_SIDE + 1, 8);
        match level.validate() {
            Err(LevelError::Invalid(problems)) => {
                assert_eq!(problems.len(), 1);
                assert!(problems[0].contains("larger than 4096"));
            }
            other => panic!("expected invalid level, got {:?}", other),
        }

        let json = r#"{"id": "tall", "name": "Tall", "width": 4, "height": 1000000000, "spawn": {"x": 32.0, "y": 32.0}}"#;
        let tall = LevelData::from_json(json).unwrap();
        assert!(tall.validate().is_err());

        assert!(LevelData::new("edge", "Edge", MAX_LEVEL_SIDE, 8).validate().is_ok());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("demo.json");

        let level = LevelData::new("demo", "Demo", 8, 5);
        level.save_to_file(&path).unwrap();
        assert_eq!(LevelData::load_from_file(&path).unwrap(), level);

        let grid = level.build_grid();
        assert_eq!(grid.get(7, 4), Some(BlockKind::Stone));
    }
}
