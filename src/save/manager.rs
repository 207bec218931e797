//! Save manager for handling save/load operations
//!
//! This module provides the SaveManager struct which handles:
//! - Loading the save file, falling back to a fresh save on any problem
//! - Writing the save file atomically
//! - Progress bookkeeping (collection counters, completed levels, chest timers)
//! - Importing a save pulled from the cloud

use super::types::*;
use crate::item::{Item, Rarity, SavedItem};
use crate::loot::ChestKind;
use chrono::{DateTime, Datelike, Utc};
use std::fs;
use std::path::{Path, PathBuf};

pub struct SaveManager {
    path: PathBuf,
    data: SaveData,
}

impl SaveManager {
    /// Creates a manager for `path` holding a fresh save. Call `load()` to read the file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        SaveManager {
            path: path.as_ref().to_path_buf(),
            data: SaveData::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut SaveData {
        &mut self.data
    }

    /// Loads the save file into memory
    ///
    /// Never fails: a missing file, unreadable JSON or a newer save version all
    /// leave a default save in place.
    pub fn load(&mut self) {
        if !self.path.exists() {
            log::info!("No save at {}, starting fresh", self.path.display());
            self.data = SaveData::default();
            return;
        }

        match fs::read_to_string(&self.path)
            .map_err(SaveError::from)
            .and_then(|json| Self::parse(&json))
        {
            Ok(data) => {
                log::info!("Loaded save from {}", self.path.display());
                self.data = data;
            }
            Err(e) => {
                log::warn!("Save at {} unusable ({}), starting fresh", self.path.display(), e);
                self.data = SaveData::default();
            }
        }
    }

    fn parse(json: &str) -> Result<SaveData, SaveError> {
        let data: SaveData = serde_json::from_str(json)?;

        if data.version > CURRENT_SAVE_VERSION {
            return Err(SaveError::InvalidVersion {
                found: data.version,
                supported: CURRENT_SAVE_VERSION,
            });
        }

        Ok(data)
    }

    /// Writes the save file
    ///
    /// The JSON goes to a temporary sibling first and is renamed over the real
    /// file, so a crash mid-write never leaves a truncated save behind.
    pub fn save(&self) -> Result<PathBuf, SaveError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = self.to_json()?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        log::info!("Game saved to: {}", self.path.display());
        Ok(self.path.clone())
    }

    /// Serializes the in-memory save (pretty JSON)
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Replaces the in-memory save with one parsed from `json`
    ///
    /// On error nothing changes.
    pub fn apply_json(&mut self, json: &str) -> Result<(), SaveError> {
        self.data = Self::parse(json)?;
        Ok(())
    }

    pub fn set_inventory(&mut self, items: Vec<SavedItem>) {
        self.data.inventory = items;
    }

    pub fn set_vault(&mut self, items: Vec<SavedItem>) {
        self.data.vault_items = items;
    }

    pub fn is_developer_mode(&self) -> bool {
        self.data.developer_mode
    }

    /// Bumps the collection counters for a picked-up item
    pub fn record_item_collected(&mut self, item: &Item) {
        let count = u64::from(item.stack_count());
        self.data.total_items_collected += count;

        match item.rarity() {
            Rarity::Legendary => self.data.legendary_items_found += count,
            Rarity::Mythic => self.data.mythic_items_found += count,
            _ => {}
        }
    }

    pub fn mark_level_completed(&mut self, level_id: &str) {
        if !self.is_level_completed(level_id) {
            self.data.completed_levels.push(level_id.to_string());
        }
    }

    pub fn is_level_completed(&self, level_id: &str) -> bool {
        self.data.completed_levels.iter().any(|id| id == level_id)
    }

    fn chest_timestamp(&self, kind: ChestKind) -> i64 {
        match kind {
            ChestKind::Daily => self.data.daily_chest_last_opened,
            ChestKind::Monthly => self.data.monthly_chest_last_opened,
        }
    }

    /// Whether a chest can be opened at `now`
    ///
    /// Daily chests reset at UTC midnight, monthly chests on the first of the UTC month.
    /// A timestamp in the future (clock moved backwards) keeps the chest closed.
    pub fn can_open_chest(&self, kind: ChestKind, now: DateTime<Utc>) -> bool {
        let last_ms = self.chest_timestamp(kind);
        if last_ms <= 0 {
            return true;
        }

        let Some(last) = DateTime::<Utc>::from_timestamp_millis(last_ms) else {
            return true;
        };

        match kind {
            ChestKind::Daily => now.date_naive() > last.date_naive(),
            ChestKind::Monthly => (now.year(), now.month()) > (last.year(), last.month()),
        }
    }

    pub fn mark_chest_opened(&mut self, kind: ChestKind, now: DateTime<Utc>) {
        let millis = now.timestamp_millis();
        match kind {
            ChestKind::Daily => self.data.daily_chest_last_opened = millis,
            ChestKind::Monthly => self.data.monthly_chest_last_opened = millis,
        }
    }
}
