//! Loot rolls for mob drops and reward chests
//!
//! Everything here takes a `R: Rng` so gameplay uses `thread_rng()` while tests
//! pass a seeded `StdRng`.

use crate::item::{Item, ItemRegistry, Rarity};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};

/// Which reward chest is being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChestKind {
    Daily,
    Monthly,
}

impl ChestKind {
    fn rolls(&self) -> usize {
        match self {
            ChestKind::Daily => 3,
            ChestKind::Monthly => 5,
        }
    }

    fn luck(&self) -> f64 {
        match self {
            ChestKind::Daily => 1.0,
            ChestKind::Monthly => 4.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChestKind::Daily => "Daily Chest",
            ChestKind::Monthly => "Monthly Chest",
        }
    }
}

fn one() -> u32 {
    1
}

fn always() -> f64 {
    1.0
}

/// One weighted line of a drop table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootEntry {
    pub item_id: String,
    pub weight: u32,
    #[serde(default = "one")]
    pub min: u32,
    #[serde(default = "one")]
    pub max: u32,
}

/// A drop table: with probability `chance`, one entry is picked by weight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LootTable {
    #[serde(default)]
    pub entries: Vec<LootEntry>,
    #[serde(default = "always")]
    pub chance: f64,
}

impl LootTable {
    /// Rolls the table once
    ///
    /// Returns None when the chance roll fails, the table is empty, or the picked
    /// id isn't registered.
    pub fn roll<R: Rng>(&self, rng: &mut R, registry: &ItemRegistry) -> Option<Item> {
        if self.entries.is_empty() || !rng.gen_bool(self.chance.clamp(0.0, 1.0)) {
            return None;
        }

        let weights = WeightedIndex::new(self.entries.iter().map(|e| e.weight)).ok()?;
        let entry = &self.entries[weights.sample(rng)];

        let low = entry.min.max(1);
        let high = entry.max.max(low);
        let count = rng.gen_range(low..=high);

        let item = registry.create_stack(&entry.item_id, count);
        if item.is_none() {
            log::warn!("Loot table references unknown item '{}'", entry.item_id);
        }
        item
    }
}

/// Rolls a rarity tier
///
/// `luck` multiplies the weight of Rare and better tiers; 1.0 is the base table.
pub fn roll_rarity<R: Rng>(rng: &mut R, luck: f64) -> Rarity {
    roll_rarity_at_least(rng, luck, Rarity::Common)
}

fn roll_rarity_at_least<R: Rng>(rng: &mut R, luck: f64, floor: Rarity) -> Rarity {
    let tiers: Vec<Rarity> = Rarity::ALL.iter().copied().filter(|r| *r >= floor).collect();
    let weights = tiers.iter().map(|rarity| {
        if *rarity >= Rarity::Rare {
            rarity.drop_weight() * luck.max(0.0)
        } else {
            rarity.drop_weight()
        }
    });

    match WeightedIndex::new(weights) {
        Ok(index) => tiers[index.sample(rng)],
        Err(_) => floor,
    }
}

/// Picks a random item of exactly `rarity`, falling back to lower tiers when the
/// registry has nothing at that tier.
fn random_item_of_rarity<R: Rng>(rng: &mut R, registry: &ItemRegistry, rarity: Rarity) -> Option<Item> {
    let mut tier = rarity;
    loop {
        let candidates = registry.items_of_rarity(tier);
        if !candidates.is_empty() {
            let template = candidates[rng.gen_range(0..candidates.len())];
            let max = template.max_stack_size().min(5);
            return registry.create_stack(template.id(), rng.gen_range(1..=max.max(1)));
        }

        let lower = Rarity::ALL.iter().rev().find(|r| **r < tier).copied()?;
        tier = lower;
    }
}

/// Opens a reward chest
///
/// Daily chests give three items at base luck. Monthly chests give five at 4x luck
/// for Rare and above, and always contain at least one Epic-or-better item.
pub fn open_chest<R: Rng>(kind: ChestKind, rng: &mut R, registry: &ItemRegistry) -> Vec<Item> {
    let mut items: Vec<Item> = (0..kind.rolls())
        .filter_map(|_| {
            let rarity = roll_rarity(rng, kind.luck());
            random_item_of_rarity(rng, registry, rarity)
        })
        .collect();

    if kind == ChestKind::Monthly && !items.iter().any(|i| i.rarity() >= Rarity::Epic) {
        let rarity = roll_rarity_at_least(rng, kind.luck(), Rarity::Epic);
        if let Some(bonus) = random_item_of_rarity(rng, registry, rarity) {
            items.pop();
            items.push(bonus);
        }
    }

    items
}
