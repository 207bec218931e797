//! Levels: on-disk format, block grid and the live world
//!
//! A `LevelData` is what the editor writes and the loader reads. `LevelWorld::load`
//! turns one into runtime entities, and `LevelLibrary` keeps every known level in
//! overworld order.

pub mod data;
pub mod grid;
pub mod library;
pub mod world;

pub use data::{
    BlockPlacement, ButtonPlacement, DoorPlacement, ItemPlacement, LevelData, LevelError,
    LightSource, MobPlacement, ParallaxLayer, SpawnPoint, VaultPlacement,
};
pub use grid::{BlockGrid, BlockKind};
pub use library::LevelLibrary;
pub use world::{INTERACT_RANGE, Interactable, LevelWorld, Projectile};
