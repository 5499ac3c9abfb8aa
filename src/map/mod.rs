// src/map/mod.rs
pub mod rect;
pub mod space;

pub use rect::{Dir, Rect};
pub use space::{Hall, Space, SpaceId, SpaceKind};
