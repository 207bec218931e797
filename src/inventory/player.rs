use super::error::InventoryError;
use super::inventory::Inventory;
use crate::item::{Item, ItemCategory};

/// Number of slots reachable from the hotbar keys (slots 0-8)
pub const HOTBAR_SLOTS: usize = 9;

/// Player-specific inventory with hotbar and equipment
///
/// Layout:
/// - Slots 0-8: Hotbar
/// - Slots 9..capacity: Bag
/// - Weapon and armor live outside the slot list while equipped
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInventory {
    pub inventory: Inventory,

    /// Currently selected hotbar slot (0-8)
    selected_hotbar_slot: usize,

    weapon: Option<Item>,
    armor: Option<Item>,
}

impl PlayerInventory {
    pub fn new(capacity: usize) -> Self {
        Self::from_inventory(Inventory::new(capacity.max(HOTBAR_SLOTS)))
    }

    pub fn from_inventory(inventory: Inventory) -> Self {
        PlayerInventory {
            inventory,
            selected_hotbar_slot: 0,
            weapon: None,
            armor: None,
        }
    }

    pub fn selected_hotbar_slot(&self) -> usize {
        self.selected_hotbar_slot
    }

    /// Gets the item in the selected hotbar slot
    pub fn selected_item(&self) -> Option<&Item> {
        self.inventory.get(self.selected_hotbar_slot)
    }

    /// Sets the selected hotbar slot (0-8); out-of-range values are ignored
    pub fn set_hotbar_slot(&mut self, slot: usize) {
        if slot < HOTBAR_SLOTS {
            self.selected_hotbar_slot = slot;
        }
    }

    pub fn weapon(&self) -> Option<&Item> {
        self.weapon.as_ref()
    }

    pub fn armor(&self) -> Option<&Item> {
        self.armor.as_ref()
    }

    /// Equips the weapon or armor in `slot`
    ///
    /// Whatever was equipped before goes back into that same slot.
    pub fn equip_from_slot(&mut self, slot: usize) -> Result<(), InventoryError> {
        let category = self
            .inventory
            .get(slot)
            .map(Item::category)
            .ok_or(if slot < self.inventory.capacity() {
                InventoryError::EmptySlot(slot)
            } else {
                InventoryError::InvalidSlot(slot)
            })?;

        let equipment = match category {
            ItemCategory::Weapon => &mut self.weapon,
            ItemCategory::Armor => &mut self.armor,
            _ => {
                let id = self.inventory.get(slot).map(|i| i.id().to_string()).unwrap_or_default();
                return Err(InventoryError::NotEquippable(id));
            }
        };

        let item = self.inventory.take_from_slot(slot, u32::MAX)?;
        if let Some(previous) = equipment.replace(item) {
            self.inventory.place_in_slot(slot, previous)?;
        }
        Ok(())
    }

    /// Moves the equipped weapon back into the bag
    pub fn unequip_weapon(&mut self) -> Result<(), InventoryError> {
        Self::unequip(&mut self.weapon, &mut self.inventory)
    }

    pub fn unequip_armor(&mut self) -> Result<(), InventoryError> {
        Self::unequip(&mut self.armor, &mut self.inventory)
    }

    fn unequip(equipment: &mut Option<Item>, inventory: &mut Inventory) -> Result<(), InventoryError> {
        let Some(item) = equipment.take() else {
            return Ok(());
        };
        if let Some(back) = inventory.add_item(item) {
            *equipment = Some(back);
            return Err(InventoryError::InventoryFull);
        }
        Ok(())
    }

    /// Flat defense from equipped armor
    pub fn total_defense(&self) -> f32 {
        self.armor.as_ref().map(Item::defense).unwrap_or(0.0)
    }

    /// Bonus damage from the equipped weapon
    pub fn weapon_damage(&self) -> f32 {
        self.weapon.as_ref().map(Item::damage).unwrap_or(0.0)
    }

    /// Checks if the player has at least `quantity` of an item
    pub fn has_item(&self, item_id: &str, quantity: u32) -> bool {
        self.inventory.count_item(item_id) >= quantity
    }

    /// Returns everything the player owns as an inventory, equipment included.
    ///
    /// The save format has no equipment slots, so equipped items are written
    /// after the bag contents.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.inventory
            .iter_items()
            .chain(self.weapon.iter())
            .chain(self.armor.iter())
    }
}
