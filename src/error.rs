// src/error.rs

use crate::map::{Rect, SpaceId};
use thiserror::Error;

/// Errors returned by [`crate::bsp::Carver::generate`].
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The requested grid cannot hold a single minimum-sized room.
    #[error("dungeon of {width}x{height} is too small to create any rooms (minimum room is {min_width}x{min_height})")]
    TooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },

    /// An internal invariant broke while carving. The pass is abandoned.
    #[error("internal carving failure: {0}")]
    Internal(#[from] CarveError),
}

/// Invariant violations inside the carver.
///
/// None of these are caused by user input: they mean the sizing formulas or
/// the recursion logic are wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarveError {
    #[error("space arena exhausted (capacity {capacity})")]
    ArenaExhausted { capacity: usize },

    #[error("scratch pool exhausted: requested {requested} slots, {available} available")]
    ScratchExhausted { requested: usize, available: usize },

    #[error("no overlap between the two sides of the cut in {rect}")]
    EmptyOverlap { rect: Rect },

    #[error("space {space} does not link back to {expected}")]
    MalformedLink { space: SpaceId, expected: SpaceId },

    #[error("corridor endpoint {space} is a hall running parallel to the corridor")]
    UnexpectedHall { space: SpaceId },

    #[error("boundary of {rect} still has unclaimed cells after carving")]
    IncompleteBoundary { rect: Rect },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("minimum room {field} must be at least 1, got {value}")]
    RoomTooSmall { field: &'static str, value: i32 },

    #[error("room_ratio_min must be in (0, 1], got {0}")]
    BadRatio(f64),

    #[error("depth_max must be in 2..=24, got {0}")]
    BadDepth(u32),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected arguments to the post-processing transforms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("scale factor must be at least 1, got {0}")]
    BadFactor(i32),

    #[error("shrink amount must not be negative, got {0}")]
    BadAmount(i32),

    #[error("shrinking by {amount} would leave {space} empty")]
    Degenerate { amount: i32, space: SpaceId },

    #[error("scaling by {0} overflows the grid")]
    Overflow(i32),
}
