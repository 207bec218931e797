//! Hostile creatures
//!
//! Mobs follow the same template pattern as items: `MobRegistry` holds one
//! `MobTemplate` per id, loaded from a JSON table, and `create` stamps out a live
//! `Mob` at a position.

pub mod mob;
pub mod registry;
pub mod template;

pub use mob::{Mob, MobState};
pub use registry::MobRegistry;
pub use template::MobTemplate;
