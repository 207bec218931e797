// Inventory system module
//
// This module provides inventory management for Amber Moon, including:
// - Generic slot container (also used for vaults, which are just inventories with a slot cap)
// - Player inventory with hotbar and equipment

pub mod error;
pub mod inventory;
pub mod player;

// Re-export main types
pub use error::InventoryError;
pub use inventory::Inventory;
pub use player::PlayerInventory;
