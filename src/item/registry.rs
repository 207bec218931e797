use super::definition::Item;
use super::rarity::Rarity;
use super::stack::SavedItem;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Built-in item table, one JSON object per item
const DEFAULT_ITEMS: &str = include_str!("../../assets/items.json");

/// Errors raised while registering templates (items or mobs)
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("'{0}' is already registered")]
    Duplicate(String),

    #[error("invalid template '{id}': {reason}")]
    InvalidTemplate { id: String, reason: String },

    #[error("could not parse template table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not read template table: {0}")]
    Io(#[from] std::io::Error),
}

/// Central registry of all item templates
///
/// This is the single source of truth for what items exist in the game.
/// Inventories, vaults, saves and levels only store ids; new instances are
/// always clones of the template registered here.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<String, Item>,
}

impl ItemRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        ItemRegistry {
            items: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in item table registered
    pub fn create_default() -> Self {
        let mut registry = Self::new();

        match registry.load_from_str(DEFAULT_ITEMS) {
            Ok(count) => log::debug!("Registered {} built-in items", count),
            Err(e) => log::error!("Built-in item table is broken: {}", e),
        }

        registry
    }

    /// Registers a new item template
    ///
    /// Returns an error if the id is taken or the template can't hold any items.
    pub fn register(&mut self, template: Item) -> Result<(), RegistryError> {
        if template.id().is_empty() {
            return Err(RegistryError::InvalidTemplate {
                id: template.name().to_string(),
                reason: "empty id".to_string(),
            });
        }
        if template.max_stack_size() == 0 {
            return Err(RegistryError::InvalidTemplate {
                id: template.id().to_string(),
                reason: "max stack size must be at least 1".to_string(),
            });
        }
        if self.items.contains_key(template.id()) {
            return Err(RegistryError::Duplicate(template.id().to_string()));
        }

        self.items.insert(template.id().to_string(), template);
        Ok(())
    }

    /// Registers every template in a JSON array
    ///
    /// Stops at the first invalid or duplicate template. Returns how many were added.
    pub fn load_from_str(&mut self, json: &str) -> Result<usize, RegistryError> {
        let templates: Vec<Item> = serde_json::from_str(json)?;
        let count = templates.len();

        for template in templates {
            self.register(template)?;
        }

        Ok(count)
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        self.load_from_str(&json)
    }

    /// Gets a template by ID
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns all templates sorted by id
    pub fn all_items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| a.id().cmp(b.id()));
        items
    }

    /// Returns all templates of one rarity, sorted by id
    pub fn items_of_rarity(&self, rarity: Rarity) -> Vec<&Item> {
        self.all_items()
            .into_iter()
            .filter(|item| item.rarity() == rarity)
            .collect()
    }

    /// Creates a fresh single instance of a template
    pub fn create(&self, id: &str) -> Option<Item> {
        self.items.get(id).cloned()
    }

    /// Creates an instance holding `count` items, clamped to `1..=max_stack_size`
    pub fn create_stack(&self, id: &str, count: u32) -> Option<Item> {
        let mut item = self.create(id)?;
        item.set_stack_count_clamped(count);
        Some(item)
    }

    /// Turns a saved `(itemId, stackCount)` pair back into an item.
    ///
    /// Unknown ids yield None; an out-of-range count is clamped.
    pub fn restore(&self, saved: &SavedItem) -> Option<Item> {
        self.create_stack(&saved.item_id, saved.stack_count)
    }
}
