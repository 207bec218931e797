use crate::loot::{LootEntry, LootTable};
use serde::{Deserialize, Serialize};

fn always() -> f64 {
    1.0
}

/// Static description of a mob type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobTemplate {
    pub id: String,
    pub name: String,
    pub max_health: f32,
    pub contact_damage: f32,
    /// Patrol speed in px/s
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub defense: f32,
    /// Flying mobs ignore gravity and ledges
    #[serde(default)]
    pub flying: bool,
    #[serde(default = "always")]
    pub drop_chance: f64,
    #[serde(default)]
    pub drops: Vec<LootEntry>,
}

impl MobTemplate {
    pub fn loot_table(&self) -> LootTable {
        LootTable {
            entries: self.drops.clone(),
            chance: self.drop_chance,
        }
    }
}
