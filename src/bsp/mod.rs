// src/bsp/mod.rs
pub mod bsp_arena;
pub mod bsp_boundary;
mod bsp_procedural;
pub mod bsp_scratch;
mod bsp_util; // Not public, used internally
pub mod debug_viz;
pub use bsp_arena::SpaceArena;
pub use bsp_boundary::{Boundary, BoundaryIndex, Edge};
pub use bsp_procedural::{Carver, CarverConfig, GenerationStats, JunctionSplit};
pub use bsp_scratch::{ScratchArena, ScratchStack, ScratchView, Slot};

/// Recursion levels of a default carver, the root included.
pub const DEFAULT_DEPTH_MAX: u32 = 16;
