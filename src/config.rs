//! Game configuration
//!
//! Configuration lives in a JSON file next to the user's other config
//! (`<config_dir>/amber_moon/config.json`). Every field is optional; anything
//! missing takes its default, and a broken file falls back to defaults entirely.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "amber_moon";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Platformer tuning, all in pixels and seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub max_fall_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 1800.0,
            move_speed: 180.0,
            jump_velocity: 520.0,
            max_fall_speed: 900.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Where the save file lives; defaults to the platform data dir
    pub save_path: Option<PathBuf>,
    /// Extra level files to load on top of the built-in ones
    pub levels_dir: Option<PathBuf>,
    /// Apps Script web-app URL; cloud sync is off without it
    pub cloud_url: Option<String>,
    pub username: Option<String>,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub inventory_slots: usize,
    pub vault_slots: usize,
    pub physics: PhysicsConfig,
    /// Seconds per simulation step
    pub fixed_timestep: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            save_path: None,
            levels_dir: None,
            cloud_url: None,
            username: None,
            viewport_width: 640.0,
            viewport_height: 360.0,
            inventory_slots: 27,
            vault_slots: 54,
            physics: PhysicsConfig::default(),
            fixed_timestep: 1.0 / 60.0,
        }
    }
}

impl GameConfig {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.json")
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Loads the config, falling back to defaults when the file is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Resolved save file path
    pub fn save_path(&self) -> PathBuf {
        self.save_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("save.json")
        })
    }

    /// Directory the level editor writes to
    pub fn editor_output_dir(&self) -> PathBuf {
        self.levels_dir.clone().unwrap_or_else(|| {
            self.save_path()
                .parent()
                .map(|dir| dir.join("levels"))
                .unwrap_or_else(|| PathBuf::from("levels"))
        })
    }
}
