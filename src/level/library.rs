use super::data::{LevelData, LevelError};
use crate::save::SaveData;
use std::path::Path;

/// Levels shipped with the game, in overworld order
const BUILTIN_LEVELS: [&str; 3] = [
    include_str!("../../assets/levels/tutorial.json"),
    include_str!("../../assets/levels/amber_caves.json"),
    include_str!("../../assets/levels/moon_tower.json"),
];

/// Every level the game knows about, in the order they were added.
///
/// Adding a level with an id that already exists replaces it in place, so a level
/// saved from the editor shadows the built-in copy.
#[derive(Debug, Clone, Default)]
pub struct LevelLibrary {
    levels: Vec<LevelData>,
}

impl LevelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library holding the built-in levels
    pub fn with_builtin() -> Self {
        let mut library = Self::new();
        for json in BUILTIN_LEVELS {
            match LevelData::from_json(json) {
                Ok(level) => {
                    library.insert(level);
                }
                Err(e) => log::error!("Built-in level is broken: {}", e),
            }
        }
        library
    }

    /// Adds or replaces a level. Returns true if it replaced one.
    pub fn insert(&mut self, level: LevelData) -> bool {
        match self.levels.iter_mut().find(|existing| existing.id == level.id) {
            Some(existing) => {
                *existing = level;
                true
            }
            None => {
                self.levels.push(level);
                false
            }
        }
    }

    /// Loads every `*.json` file in `dir`, in file-name order
    ///
    /// Files that fail to parse or validate are skipped with a warning. Returns how
    /// many levels were added.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, LevelError> {
        let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut count = 0;
        for path in paths {
            let level = LevelData::load_from_file(&path).and_then(|level| {
                level.validate()?;
                Ok(level)
            });
            match level {
                Ok(level) => {
                    log::debug!("Loaded level '{}' from {}", level.id, path.display());
                    self.insert(level);
                    count += 1;
                }
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        Ok(count)
    }

    pub fn get(&self, id: &str) -> Option<&LevelData> {
        self.levels.iter().find(|level| level.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelData> {
        self.levels.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.levels.iter().map(|level| level.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Whether a level can be entered
    ///
    /// A level is open when it has no prerequisite, its prerequisite is completed,
    /// or developer mode is on. Unknown levels are never open.
    pub fn is_unlocked(&self, id: &str, save: &SaveData) -> bool {
        let Some(level) = self.get(id) else {
            return false;
        };

        save.developer_mode
            || level
                .requires
                .as_ref()
                .is_none_or(|required| save.completed_levels.iter().any(|done| done == required))
    }
}
