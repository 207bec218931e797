use super::rarity::Rarity;
use super::stack::SavedItem;
use crate::inventory::InventoryError;
use crate::stats::StatusEffectAttachment;
use serde::{Deserialize, Serialize};

/// Broad item category, used by equipment and consumption rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Consumable,
    Material,
    Key,
    Treasure,
}

/// Ranged-weapon attachment. A weapon with one fires projectiles instead of swinging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangedWeapon {
    /// Pixels per second
    pub projectile_speed: f32,
    /// Pixels travelled before the projectile disappears
    pub range: f32,
    /// Seconds between shots
    pub cooldown: f32,
}

fn one() -> u32 {
    1
}

/// An item, either a registry template or an instance cloned from one.
///
/// Everything except the stack count is fixed when the template is registered;
/// instances only ever change how many of themselves they represent. Fields are
/// private so nothing can break `1 <= stack_count <= max_stack_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    category: ItemCategory,
    #[serde(default)]
    rarity: Rarity,
    #[serde(default)]
    damage: f32,
    #[serde(default)]
    defense: f32,
    #[serde(default)]
    heal_amount: f32,
    #[serde(default)]
    ranged: Option<RangedWeapon>,
    #[serde(default)]
    status_effect: Option<StatusEffectAttachment>,
    #[serde(default = "one")]
    max_stack_size: u32,
    #[serde(skip, default = "one")]
    stack_count: u32,
}

impl Item {
    /// Creates a template with no combat stats.
    ///
    /// Use the `with_*` builders to fill in the rest before registering it.
    pub fn template(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ItemCategory,
        rarity: Rarity,
        max_stack_size: u32,
    ) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            rarity,
            damage: 0.0,
            defense: 0.0,
            heal_amount: 0.0,
            ranged: None,
            status_effect: None,
            max_stack_size,
            stack_count: 1,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_defense(mut self, defense: f32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_heal(mut self, heal_amount: f32) -> Self {
        self.heal_amount = heal_amount;
        self
    }

    pub fn with_ranged(mut self, ranged: RangedWeapon) -> Self {
        self.ranged = Some(ranged);
        self
    }

    pub fn with_status_effect(mut self, effect: StatusEffectAttachment) -> Self {
        self.status_effect = Some(effect);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn defense(&self) -> f32 {
        self.defense
    }

    pub fn heal_amount(&self) -> f32 {
        self.heal_amount
    }

    pub fn ranged(&self) -> Option<&RangedWeapon> {
        self.ranged.as_ref()
    }

    pub fn status_effect(&self) -> Option<&StatusEffectAttachment> {
        self.status_effect.as_ref()
    }

    pub fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    pub fn stack_count(&self) -> u32 {
        self.stack_count
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack_size > 1
    }

    /// Returns true if the stack is at its max size
    pub fn is_full(&self) -> bool {
        self.stack_count >= self.max_stack_size
    }

    /// Sets the stack count, rejecting 0 and anything above the max stack size.
    pub fn set_stack_count(&mut self, count: u32) -> Result<(), InventoryError> {
        if count == 0 || count > self.max_stack_size {
            return Err(InventoryError::StackOverflow {
                item_id: self.id.clone(),
                requested: count,
                max: self.max_stack_size,
            });
        }
        self.stack_count = count;
        Ok(())
    }

    /// Sets the stack count, clamping into `1..=max_stack_size`.
    pub(crate) fn set_stack_count_clamped(&mut self, count: u32) {
        self.stack_count = count.clamp(1, self.max_stack_size.max(1));
    }

    /// Adds `amount` to this stack
    ///
    /// Returns how many didn't fit (overflow).
    pub fn add_to_stack(&mut self, amount: u32) -> u32 {
        let room = self.max_stack_size.saturating_sub(self.stack_count);
        let added = amount.min(room);
        self.stack_count += added;
        amount - added
    }

    /// Removes up to `amount` from this stack, never below zero.
    ///
    /// Returns how many were actually taken. A stack taken down to zero must be
    /// discarded by the caller.
    pub fn take_from_stack(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.stack_count);
        self.stack_count -= taken;
        taken
    }

    /// Splits `amount` off into a new instance.
    ///
    /// Returns None when `amount` is 0 or would empty this stack.
    pub fn split(&mut self, amount: u32) -> Option<Item> {
        if amount == 0 || amount >= self.stack_count {
            return None;
        }
        self.stack_count -= amount;
        let mut split = self.clone();
        split.stack_count = amount;
        Some(split)
    }

    /// Returns true if this item can stack with another
    pub fn can_stack_with(&self, other: &Item) -> bool {
        self.id == other.id && self.is_stackable()
    }

    pub fn to_saved(&self) -> SavedItem {
        SavedItem::new(self.id.clone(), self.stack_count)
    }
}
