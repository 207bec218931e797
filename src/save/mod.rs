//! Save/Load system for Amber Moon
//!
//! One JSON save file per player holds the in-memory progress lists:
//! - developer mode flag and chest timestamps
//! - collection counters (total, legendary, mythic)
//! - inventory and persistent vault contents as `{itemId, stackCount}` pairs
//! - completed level ids
//!
//! # Architecture
//!
//! - `types`: `SaveData` (the file format) and `SaveError`
//! - `manager`: `SaveManager`, which owns the data and the file path
//!
//! Loading never fails: a missing, malformed or too-new file falls back to a fresh
//! `SaveData` and logs why. Writing can fail and returns `SaveError`.
//!
//! # Example Usage
//!
//! ```ignore
//! let mut saves = SaveManager::new(config.save_path());
//! saves.load();
//! saves.data_mut().developer_mode = true;
//! saves.save()?;
//! ```

pub mod manager;
pub mod types;

// Re-export commonly used types
pub use manager::SaveManager;
pub use types::*;
