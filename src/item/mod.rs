// Item system module
//
// This module provides the core item system for Amber Moon, including:
// - Item templates and instances (one data row per item, no per-item types)
// - Rarity tiers with display colors and loot weights
// - The item registry that clones templates into new instances
// - SavedItem, the (itemId, stackCount) pair persisted in saves and levels

pub mod definition;
pub mod rarity;
pub mod registry;
pub mod stack;

// Re-export main types for convenient access
pub use definition::{Item, ItemCategory, RangedWeapon};
pub use rarity::Rarity;
pub use registry::{ItemRegistry, RegistryError};
pub use stack::SavedItem;
