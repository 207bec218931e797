use thiserror::Error;

/// Errors that can occur during inventory operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Slot index out of bounds
    #[error("Invalid slot index: {0}")]
    InvalidSlot(usize),

    /// Slot is empty where an item was expected
    #[error("Slot {0} is empty")]
    EmptySlot(usize),

    /// Slot holds a different item
    #[error("Slot {0} is occupied")]
    SlotOccupied(usize),

    /// No room left for the item
    #[error("Inventory is full")]
    InventoryFull,

    /// A stack count outside `1..=max`
    #[error("Stack of '{item_id}' can't hold {requested} (max {max})")]
    StackOverflow {
        item_id: String,
        requested: u32,
        max: u32,
    },

    /// The item can't go in that equipment slot
    #[error("'{0}' can't be equipped there")]
    NotEquippable(String),

    /// The container isn't open
    #[error("Container is closed")]
    Closed,

    /// Tried to remove more items than exist
    #[error("Insufficient items (requested: {requested}, available: {available})")]
    InsufficientItems { requested: u32, available: u32 },
}
