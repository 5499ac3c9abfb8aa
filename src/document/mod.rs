// src/document/mod.rs
mod dungeon;

pub use self::dungeon::{Dungeon, DungeonStats};
