// src/bsp/bsp_boundary.rs

//! Boundary index: which space owns each edge cell of a region.
//!
//! For a region, the North array holds, per column, the space covering that
//! column whose shape sits furthest north; South, West and East work the same
//! way. Stitching two sibling regions only ever reads the two edges facing the
//! cut, so a corridor costs O(edge length) instead of a scan over every space.
//!
//! A child region writes straight into the slices of its parent's arrays that
//! it shares with the parent. Only the two inner edges exposed by a cut live
//! in scratch memory.

use crate::bsp::bsp_arena::SpaceArena;
use crate::bsp::bsp_scratch::Slot;
use crate::map::{Dir, Rect, Space, SpaceId};
use std::ops::Range;

/// A cardinal edge of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    North,
    South,
    West,
    East,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::North, Edge::South, Edge::West, Edge::East];

    /// Whether `candidate` is at least as close to this edge as `current`.
    ///
    /// Ties go to the candidate, so the space registered last wins.
    pub fn is_closer(self, candidate: &Rect, current: &Rect) -> bool {
        match self {
            Edge::North => candidate.begin_row <= current.begin_row,
            Edge::South => candidate.end_row >= current.end_row,
            Edge::West => candidate.begin_col <= current.begin_col,
            Edge::East => candidate.end_col >= current.end_col,
        }
    }
}

/// Borrowed boundary arrays of one region during carving.
#[derive(Debug)]
pub struct BoundaryIndex<'a> {
    rect: Rect,
    north: &'a mut [Slot],
    south: &'a mut [Slot],
    west: &'a mut [Slot],
    east: &'a mut [Slot],
    spaces: Range<usize>,
}

impl<'a> BoundaryIndex<'a> {
    pub fn new(
        rect: Rect,
        north: &'a mut [Slot],
        south: &'a mut [Slot],
        west: &'a mut [Slot],
        east: &'a mut [Slot],
    ) -> Self {
        debug_assert_eq!(north.len(), rect.width() as usize);
        debug_assert_eq!(south.len(), rect.width() as usize);
        debug_assert_eq!(west.len(), rect.height() as usize);
        debug_assert_eq!(east.len(), rect.height() as usize);
        BoundaryIndex {
            rect,
            north,
            south,
            west,
            east,
            spaces: 0..0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn edge(&self, edge: Edge) -> &[Slot] {
        match edge {
            Edge::North => &*self.north,
            Edge::South => &*self.south,
            Edge::West => &*self.west,
            Edge::East => &*self.east,
        }
    }

    /// Arena range of every space carved inside this region.
    pub fn spaces(&self) -> Range<usize> {
        self.spaces.clone()
    }

    pub fn set_spaces(&mut self, spaces: Range<usize>) {
        self.spaces = spaces;
    }

    pub fn is_complete(&self) -> bool {
        Edge::ALL
            .iter()
            .all(|&edge| self.edge(edge).iter().all(Option::is_some))
    }

    /// Registers `id` on every edge cell its shape covers, wherever it is at
    /// least as close to that edge as the current owner.
    pub fn claim(&mut self, spaces: &SpaceArena, id: SpaceId) {
        self.claim_among(spaces.as_slice(), id);
    }

    fn claim_among(&mut self, spaces: &[Space], id: SpaceId) {
        let shape = spaces[id.index()].shape();
        let rect = self.rect;

        let cols = shape.begin_col.max(rect.begin_col)..shape.end_col.min(rect.end_col);
        for col in cols {
            let i = (col - rect.begin_col) as usize;
            claim_slot(&mut self.north[i], Edge::North, id, &shape, spaces);
            claim_slot(&mut self.south[i], Edge::South, id, &shape, spaces);
        }

        let rows = shape.begin_row.max(rect.begin_row)..shape.end_row.min(rect.end_row);
        for row in rows {
            let i = (row - rect.begin_row) as usize;
            claim_slot(&mut self.west[i], Edge::West, id, &shape, spaces);
            claim_slot(&mut self.east[i], Edge::East, id, &shape, spaces);
        }
    }

    /// Boundary indices of the two halves of a cut at `pos` along `dir`.
    ///
    /// The halves borrow the parts of this region's arrays they share with
    /// it; `first_inner` becomes the first half's far edge and
    /// `second_inner` the second half's near edge. The cell of the cut line
    /// on the two crossing edges is left to the corridor.
    pub fn split<'b>(
        &'b mut self,
        dir: Dir,
        pos: i32,
        first_inner: &'b mut [Slot],
        second_inner: &'b mut [Slot],
    ) -> (BoundaryIndex<'b>, BoundaryIndex<'b>) {
        let (first_rect, second_rect) = self.rect.split(dir, pos);
        let cut = (pos - self.rect.begin_longitude(dir)) as usize;
        let BoundaryIndex {
            north,
            south,
            west,
            east,
            ..
        } = self;

        match dir {
            Dir::Horiz => {
                let (north_a, north_b) = split_around(north, cut);
                let (south_a, south_b) = split_around(south, cut);
                (
                    BoundaryIndex::new(first_rect, north_a, south_a, west, first_inner),
                    BoundaryIndex::new(second_rect, north_b, south_b, second_inner, east),
                )
            }
            Dir::Vert => {
                let (west_a, west_b) = split_around(west, cut);
                let (east_a, east_b) = split_around(east, cut);
                (
                    BoundaryIndex::new(first_rect, north, first_inner, west_a, east_a),
                    BoundaryIndex::new(second_rect, second_inner, south, west_b, east_b),
                )
            }
        }
    }
}

fn claim_slot(slot: &mut Slot, edge: Edge, id: SpaceId, shape: &Rect, spaces: &[Space]) {
    match *slot {
        Some(current) if !edge.is_closer(shape, &spaces[current.index()].shape()) => {}
        _ => *slot = Some(id),
    }
}

fn split_around(slots: &mut [Slot], cut: usize) -> (&mut [Slot], &mut [Slot]) {
    let (head, tail) = slots.split_at_mut(cut);
    (head, &mut tail[1..])
}

/// Owned boundary arrays of the root region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundary {
    rect: Rect,
    north: Vec<Slot>,
    south: Vec<Slot>,
    west: Vec<Slot>,
    east: Vec<Slot>,
}

impl Boundary {
    pub fn new(rect: Rect) -> Self {
        let width = rect.width().max(0) as usize;
        let height = rect.height().max(0) as usize;
        Boundary {
            rect,
            north: vec![None; width],
            south: vec![None; width],
            west: vec![None; height],
            east: vec![None; height],
        }
    }

    /// Boundary of `rect` rebuilt from scratch by claiming every space in
    /// id order. Shapes are clipped to `rect`.
    pub fn from_spaces(rect: Rect, spaces: &[Space]) -> Self {
        let mut boundary = Boundary::new(rect);
        {
            let mut index = boundary.index();
            for i in 0..spaces.len() {
                index.claim_among(spaces, SpaceId::new(i));
            }
        }
        boundary
    }

    pub fn index(&mut self) -> BoundaryIndex<'_> {
        BoundaryIndex::new(
            self.rect,
            &mut self.north,
            &mut self.south,
            &mut self.west,
            &mut self.east,
        )
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn edge(&self, edge: Edge) -> &[Slot] {
        match edge {
            Edge::North => &self.north,
            Edge::South => &self.south,
            Edge::West => &self.west,
            Edge::East => &self.east,
        }
    }

    /// Owner of the `i`-th cell of `edge`, counted from the region's start.
    pub fn owner(&self, edge: Edge, i: usize) -> Option<SpaceId> {
        self.edge(edge).get(i).copied().flatten()
    }

    pub fn is_complete(&self) -> bool {
        Edge::ALL
            .iter()
            .all(|&edge| self.edge(edge).iter().all(Option::is_some))
    }
}
