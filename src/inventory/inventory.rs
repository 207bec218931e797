use super::error::InventoryError;
use crate::item::{Item, ItemRegistry, SavedItem};

/// Generic inventory container with slots
///
/// This is the core storage structure used by the player's bag, the persistent
/// vault and per-level vaults. It handles slot management, stacking, and moving
/// items between containers.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    /// Slots that can hold item stacks (None = empty)
    slots: Vec<Option<Item>>,

    /// Maximum number of slots
    capacity: usize,
}

impl Inventory {
    /// Creates a new empty inventory with the specified capacity
    pub fn new(capacity: usize) -> Self {
        Inventory {
            slots: vec![None; capacity],
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if the inventory has no items
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Returns true if all slots are occupied
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    fn check_slot(&self, slot_index: usize) -> Result<(), InventoryError> {
        if slot_index >= self.capacity {
            Err(InventoryError::InvalidSlot(slot_index))
        } else {
            Ok(())
        }
    }

    /// Returns the item in a slot, or None when the slot is empty or out of range
    pub fn get(&self, slot_index: usize) -> Option<&Item> {
        self.slots.get(slot_index).and_then(|slot| slot.as_ref())
    }

    /// Counts how many of a specific item are in the inventory
    pub fn count_item(&self, item_id: &str) -> u32 {
        self.iter_items()
            .filter(|item| item.id() == item_id)
            .map(|item| item.stack_count())
            .sum()
    }

    pub fn has_item(&self, item_id: &str, quantity: u32) -> bool {
        self.count_item(item_id) >= quantity
    }

    /// Finds the first empty slot index
    pub fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// Adds an item (of any stack count) to the inventory
    ///
    /// Returns whatever didn't fit, or None if everything was stored.
    ///
    /// # Strategy
    /// 1. Top up existing stacks of the same item
    /// 2. Put the rest in the first empty slot
    pub fn add_item(&mut self, mut item: Item) -> Option<Item> {
        if item.is_stackable() {
            for existing in self.slots.iter_mut().flatten() {
                if existing.can_stack_with(&item) && !existing.is_full() {
                    let overflow = existing.add_to_stack(item.stack_count());
                    if overflow == 0 {
                        return None;
                    }
                    item.set_stack_count_clamped(overflow);
                }
            }
        }

        match self.find_empty_slot() {
            Some(empty_index) => {
                self.slots[empty_index] = Some(item);
                None
            }
            None => Some(item),
        }
    }

    /// Removes up to `quantity` of an item, scanning slots in order
    ///
    /// Returns how many were actually removed.
    pub fn remove_item(&mut self, item_id: &str, quantity: u32) -> u32 {
        let mut remaining = quantity;

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }

            if let Some(item) = slot {
                if item.id() == item_id {
                    remaining -= item.take_from_stack(remaining);

                    if item.stack_count() == 0 {
                        *slot = None;
                    }
                }
            }
        }

        quantity - remaining
    }

    /// Removes exactly `quantity` of an item or nothing at all
    pub fn remove_exact(&mut self, item_id: &str, quantity: u32) -> Result<(), InventoryError> {
        let available = self.count_item(item_id);
        if available < quantity {
            return Err(InventoryError::InsufficientItems {
                requested: quantity,
                available,
            });
        }
        self.remove_item(item_id, quantity);
        Ok(())
    }

    /// Takes up to `quantity` items out of one slot
    ///
    /// Taking the whole stack (or more) empties the slot.
    pub fn take_from_slot(&mut self, slot_index: usize, quantity: u32) -> Result<Item, InventoryError> {
        self.check_slot(slot_index)?;

        let slot = &mut self.slots[slot_index];
        let item = slot.as_mut().ok_or(InventoryError::EmptySlot(slot_index))?;

        if quantity >= item.stack_count() {
            slot.take().ok_or(InventoryError::EmptySlot(slot_index))
        } else {
            item.split(quantity).ok_or(InventoryError::EmptySlot(slot_index))
        }
    }

    /// Places an item in a specific slot
    ///
    /// An empty slot takes the item; a slot with the same stackable item tops up
    /// and hands back the overflow; anything else is `SlotOccupied`.
    pub fn place_in_slot(&mut self, slot_index: usize, item: Item) -> Result<Option<Item>, InventoryError> {
        self.check_slot(slot_index)?;

        match &mut self.slots[slot_index] {
            None => {
                self.slots[slot_index] = Some(item);
                Ok(None)
            }
            Some(existing) if existing.can_stack_with(&item) => {
                let overflow = existing.add_to_stack(item.stack_count());
                if overflow == 0 {
                    Ok(None)
                } else {
                    let mut rest = item;
                    rest.set_stack_count_clamped(overflow);
                    Ok(Some(rest))
                }
            }
            Some(_) => Err(InventoryError::SlotOccupied(slot_index)),
        }
    }

    /// Swaps the contents of two slots
    pub fn swap_slots(&mut self, slot_a: usize, slot_b: usize) -> Result<(), InventoryError> {
        self.check_slot(slot_a)?;
        self.check_slot(slot_b)?;

        self.slots.swap(slot_a, slot_b);
        Ok(())
    }

    /// Moves the whole stack in `slot_index` into another inventory
    ///
    /// Whatever doesn't fit stays in the original slot. Returns how many items moved.
    pub fn transfer_slot_to(&mut self, slot_index: usize, other: &mut Inventory) -> Result<u32, InventoryError> {
        self.check_slot(slot_index)?;

        let item = self.slots[slot_index]
            .take()
            .ok_or(InventoryError::EmptySlot(slot_index))?;
        let total = item.stack_count();

        match other.add_item(item) {
            None => Ok(total),
            Some(leftover) => {
                let moved = total - leftover.stack_count();
                self.slots[slot_index] = Some(leftover);
                if moved == 0 {
                    Err(InventoryError::InventoryFull)
                } else {
                    Ok(moved)
                }
            }
        }
    }

    /// Clears all items from the inventory
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Iterates over the slots, empty ones included
    pub fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }

    /// Returns an iterator over all non-empty item stacks
    pub fn iter_items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Converts the inventory to its saved form (non-empty slots, in order)
    pub fn to_saved(&self) -> Vec<SavedItem> {
        self.iter_items().map(Item::to_saved).collect()
    }

    /// Rebuilds an inventory from saved entries
    ///
    /// Unknown item ids are skipped and entries beyond `capacity` are dropped,
    /// both with a warning. Each entry gets its own slot, in order.
    pub fn from_saved(saved: &[SavedItem], capacity: usize, registry: &ItemRegistry) -> Self {
        let mut inventory = Inventory::new(capacity);
        let mut next_slot = 0;

        for entry in saved {
            let Some(item) = registry.restore(entry) else {
                log::warn!("Skipping unknown saved item '{}'", entry.item_id);
                continue;
            };

            if next_slot >= capacity {
                log::warn!(
                    "Dropping saved item '{}' x{}: only {} slots",
                    entry.item_id,
                    entry.stack_count,
                    capacity
                );
                continue;
            }

            inventory.slots[next_slot] = Some(item);
            next_slot += 1;
        }

        inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ItemRegistry {
        ItemRegistry::create_default()
    }

    #[test]
    fn test_add_stacks_before_using_new_slots() {
        let registry = registry();
        let mut inventory = Inventory::new(3);

        assert!(inventory.add_item(registry.create_stack("amber_shard", 50).unwrap()).is_none());
        assert!(inventory.add_item(registry.create_stack("amber_shard", 60).unwrap()).is_none());

        // 99 + 11 across two slots
        assert_eq!(inventory.count_item("amber_shard"), 110);
        assert_eq!(inventory.get(0).unwrap().stack_count(), 99);
        assert_eq!(inventory.get(1).unwrap().stack_count(), 11);
        assert!(inventory.get(2).is_none());
    }

    #[test]
    fn test_add_returns_leftover_when_full() {
        let registry = registry();
        let mut inventory = Inventory::new(1);

        inventory.add_item(registry.create("iron_sword").unwrap());
        let leftover = inventory.add_item(registry.create("wooden_sword").unwrap());

        assert_eq!(leftover.map(|i| i.id().to_string()), Some("wooden_sword".to_string()));
        assert!(inventory.is_full());
    }

    #[test]
    fn test_partial_fit_returns_remaining_count() {
        let registry = registry();
        let mut inventory = Inventory::new(1);
        inventory.add_item(registry.create_stack("amber_shard", 95).unwrap());

        let leftover = inventory
            .add_item(registry.create_stack("amber_shard", 10).unwrap())
            .unwrap();
        assert_eq!(leftover.stack_count(), 6);
        assert_eq!(inventory.count_item("amber_shard"), 99);
    }

    #[test]
    fn test_remove_item_clears_empty_slots() {
        let registry = registry();
        let mut inventory = Inventory::new(3);
        inventory.add_item(registry.create_stack("health_potion", 3).unwrap());

        assert_eq!(inventory.remove_item("health_potion", 5), 3);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_remove_exact_is_all_or_nothing() {
        let registry = registry();
        let mut inventory = Inventory::new(3);
        inventory.add_item(registry.create_stack("bronze_key", 1).unwrap());

        assert_eq!(
            inventory.remove_exact("bronze_key", 2),
            Err(InventoryError::InsufficientItems { requested: 2, available: 1 })
        );
        assert_eq!(inventory.count_item("bronze_key"), 1);
        assert!(inventory.remove_exact("bronze_key", 1).is_ok());
    }

    #[test]
    fn test_slot_bounds_are_checked() {
        let mut inventory = Inventory::new(2);
        assert_eq!(inventory.swap_slots(0, 2), Err(InventoryError::InvalidSlot(2)));
        assert!(matches!(inventory.take_from_slot(5, 1), Err(InventoryError::InvalidSlot(5))));
        assert!(matches!(inventory.take_from_slot(1, 1), Err(InventoryError::EmptySlot(1))));
        assert!(inventory.get(99).is_none());
    }

    #[test]
    fn test_take_from_slot_splits() {
        let registry = registry();
        let mut inventory = Inventory::new(2);
        inventory.add_item(registry.create_stack("moon_dust", 10).unwrap());

        let taken = inventory.take_from_slot(0, 4).unwrap();
        assert_eq!(taken.stack_count(), 4);
        assert_eq!(inventory.count_item("moon_dust"), 6);

        let rest = inventory.take_from_slot(0, 100).unwrap();
        assert_eq!(rest.stack_count(), 6);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_place_in_occupied_slot() {
        let registry = registry();
        let mut inventory = Inventory::new(2);
        inventory.add_item(registry.create("iron_sword").unwrap());

        let result = inventory.place_in_slot(0, registry.create("amber_shard").unwrap());
        assert_eq!(result, Err(InventoryError::SlotOccupied(0)));
    }

    #[test]
    fn test_transfer_slot_to_vault() {
        let registry = registry();
        let mut bag = Inventory::new(2);
        let mut vault = Inventory::new(1);
        bag.add_item(registry.create_stack("gold_coin", 40).unwrap());

        assert_eq!(bag.transfer_slot_to(0, &mut vault), Ok(40));
        assert!(bag.is_empty());
        assert_eq!(vault.count_item("gold_coin"), 40);

        bag.add_item(registry.create("iron_sword").unwrap());
        assert_eq!(bag.transfer_slot_to(0, &mut vault), Err(InventoryError::InventoryFull));
        assert_eq!(bag.count_item("iron_sword"), 1);
    }

    #[test]
    fn test_saved_round_trip_skips_unknown_and_overflow() {
        let registry = registry();
        let saved = vec![
            SavedItem::new("amber_shard", 12),
            SavedItem::new("removed_item", 1),
            SavedItem::new("iron_sword", 1),
            SavedItem::new("gold_coin", 3),
        ];

        let inventory = Inventory::from_saved(&saved, 2, &registry);
        assert_eq!(
            inventory.to_saved(),
            vec![SavedItem::new("amber_shard", 12), SavedItem::new("iron_sword", 1)]
        );
    }
}
