//! Amber Moon: the headless core of a 2D platformer loot game
//!
//! Levels are played in a `scene::LootGameScene`, picked from the overworld map and
//! built in the creative editor. Items, mobs and levels are data-driven JSON; the
//! save file and optional cloud sync keep the player's progress.

pub mod animation;
pub mod camera;
pub mod cloud;
pub mod collision;
pub mod color;
pub mod combat;
pub mod config;
pub mod entity;
pub mod input;
pub mod inventory;
pub mod item;
pub mod level;
pub mod loot;
pub mod mob;
pub mod player;
pub mod save;
pub mod scene;
pub mod stats;
pub mod toast;
