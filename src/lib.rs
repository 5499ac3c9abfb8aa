// src/lib.rs

pub mod bsp;
pub mod document;
pub mod error;
pub mod map;

pub use bsp::{Carver, CarverConfig, GenerationStats};
pub use document::{Dungeon, DungeonStats};
pub use error::{CarveError, ConfigError, GenerateError, TransformError};
pub use map::{Dir, Hall, Rect, Space, SpaceId, SpaceKind};
