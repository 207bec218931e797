//! Save data types for Amber Moon
//!
//! The JSON keys are camelCase to stay compatible with save files written by
//! earlier builds of the game.

use crate::item::SavedItem;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current save file version
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// The root save file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    /// Older files have no version; they are treated as version 1
    pub version: u32,
    pub developer_mode: bool,
    /// Unix epoch milliseconds, 0 = never opened
    pub daily_chest_last_opened: i64,
    /// Unix epoch milliseconds, 0 = never opened
    pub monthly_chest_last_opened: i64,
    pub total_items_collected: u64,
    pub legendary_items_found: u64,
    pub mythic_items_found: u64,
    pub inventory: Vec<SavedItem>,
    pub vault_items: Vec<SavedItem>,
    pub completed_levels: Vec<String>,
}

impl Default for SaveData {
    fn default() -> Self {
        SaveData {
            version: CURRENT_SAVE_VERSION,
            developer_mode: false,
            daily_chest_last_opened: 0,
            monthly_chest_last_opened: 0,
            total_items_collected: 0,
            legendary_items_found: 0,
            mythic_items_found: 0,
            inventory: Vec::new(),
            vault_items: Vec::new(),
            completed_levels: Vec::new(),
        }
    }
}

/// Error types for save/load operations
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save version {found} is newer than supported version {supported}")]
    InvalidVersion { found: u32, supported: u32 },
}
