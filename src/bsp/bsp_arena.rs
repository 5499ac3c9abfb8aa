// src/bsp/bsp_arena.rs
// Fixed-capacity, append-only storage for the spaces of one generation pass.

use crate::error::CarveError;
use crate::map::{Space, SpaceId};
use std::ops::{Index, IndexMut};

/// Append-only store of [`Space`] nodes.
///
/// Capacity is reserved once per pass from a proven upper bound and never
/// grows; running past it is an internal error, not a reallocation.
#[derive(Debug, Default)]
pub struct SpaceArena {
    spaces: Vec<Space>,
    capacity: usize,
}

impl SpaceArena {
    pub fn with_capacity(capacity: usize) -> Self {
        SpaceArena {
            spaces: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Upper bound on the spaces a pass can create.
    ///
    /// A full recursion tree with `depth_max` levels has `2^(depth_max-1)` leaf
    /// rooms and one less stitch; a stitch adds one corridor plus at most a
    /// junction and a new hall on each end. Spaces never overlap and each
    /// covers at least one cell, so the grid area bounds the count as well.
    pub fn capacity_for(width: i32, height: i32, depth_max: u32) -> usize {
        let leaves = 1u64 << depth_max.saturating_sub(1).min(62);
        let tree_bound = leaves.saturating_mul(6).saturating_sub(5);
        let cell_bound = (width.max(0) as u64).saturating_mul(height.max(0) as u64);
        tree_bound.min(cell_bound).max(1) as usize
    }

    /// Empties the arena and makes sure `capacity` slots are reserved.
    pub fn reset(&mut self, capacity: usize) {
        self.spaces.clear();
        if self.spaces.capacity() < capacity {
            self.spaces.reserve_exact(capacity);
        }
        self.capacity = capacity;
    }

    pub fn push(&mut self, space: Space) -> Result<SpaceId, CarveError> {
        if self.spaces.len() >= self.capacity {
            return Err(CarveError::ArenaExhausted {
                capacity: self.capacity,
            });
        }
        let id = SpaceId::new(self.spaces.len());
        self.spaces.push(space);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, id: SpaceId) -> Option<&Space> {
        self.spaces.get(id.index())
    }

    /// Mutable access to two distinct spaces at once.
    pub fn pair_mut(&mut self, a: SpaceId, b: SpaceId) -> (&mut Space, &mut Space) {
        assert_ne!(a, b, "pair_mut needs two distinct spaces");
        let (ai, bi) = (a.index(), b.index());
        if ai < bi {
            let (lo, hi) = self.spaces.split_at_mut(bi);
            (&mut lo[ai], &mut hi[0])
        } else {
            let (lo, hi) = self.spaces.split_at_mut(ai);
            (&mut hi[0], &mut lo[bi])
        }
    }

    /// Adds an undirected edge between two spaces.
    pub fn link(&mut self, a: SpaceId, b: SpaceId) {
        let (sa, sb) = self.pair_mut(a, b);
        sa.neighbors.push(b);
        sb.neighbors.push(a);
    }

    pub fn as_slice(&self) -> &[Space] {
        &self.spaces
    }
}

impl Index<SpaceId> for SpaceArena {
    type Output = Space;

    fn index(&self, id: SpaceId) -> &Space {
        &self.spaces[id.index()]
    }
}

impl IndexMut<SpaceId> for SpaceArena {
    fn index_mut(&mut self, id: SpaceId) -> &mut Space {
        &mut self.spaces[id.index()]
    }
}
