// src/map/space.rs

use crate::map::{Dir, Rect};
use std::fmt;

/// Stable handle of a [`Space`] inside one generation pass.
///
/// Handles are indices into the pass's arena; they are never reused while the
/// arena lives and stay valid after the arena is handed to a `Dungeon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpaceId(u32);

impl SpaceId {
    pub fn new(index: usize) -> Self {
        SpaceId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A corridor: a strip `thickness` cells wide running along `dir`.
///
/// `offset` is the strip's first cell on the latitude axis; `begin..end` is
/// its extent along the longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hall {
    pub dir: Dir,
    pub offset: i32,
    pub begin: i32,
    pub end: i32,
    pub thickness: i32,
}

impl Hall {
    pub fn shape(&self) -> Rect {
        let mut rect = Rect::default();
        *rect.begin_longitude_mut(self.dir) = self.begin;
        *rect.end_longitude_mut(self.dir) = self.end;
        *rect.begin_latitude_mut(self.dir) = self.offset;
        *rect.end_latitude_mut(self.dir) = self.offset + self.thickness;
        rect
    }

    pub fn len(&self) -> i32 {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin || self.thickness <= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceKind {
    Room(Rect),
    Hall(Hall),
}

/// A node of the dungeon graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    pub kind: SpaceKind,
    pub neighbors: Vec<SpaceId>,
}

impl Space {
    pub fn room(rect: Rect) -> Self {
        Space {
            kind: SpaceKind::Room(rect),
            neighbors: Vec::with_capacity(5),
        }
    }

    pub fn hall(hall: Hall) -> Self {
        Space {
            kind: SpaceKind::Hall(hall),
            neighbors: Vec::with_capacity(5),
        }
    }

    /// The cells this space occupies.
    pub fn shape(&self) -> Rect {
        match &self.kind {
            SpaceKind::Room(rect) => *rect,
            SpaceKind::Hall(hall) => hall.shape(),
        }
    }

    pub fn is_room(&self) -> bool {
        matches!(self.kind, SpaceKind::Room(_))
    }

    /// A single-cell room, as inserted where a corridor meets a hall's side.
    pub fn is_junction(&self) -> bool {
        match &self.kind {
            SpaceKind::Room(rect) => rect.width() == 1 && rect.height() == 1,
            SpaceKind::Hall(_) => false,
        }
    }

    pub fn as_hall(&self) -> Option<&Hall> {
        match &self.kind {
            SpaceKind::Hall(hall) => Some(hall),
            SpaceKind::Room(_) => None,
        }
    }

    pub fn as_hall_mut(&mut self) -> Option<&mut Hall> {
        match &mut self.kind {
            SpaceKind::Hall(hall) => Some(hall),
            SpaceKind::Room(_) => None,
        }
    }

    pub fn is_linked_to(&self, other: SpaceId) -> bool {
        self.neighbors.contains(&other)
    }

    /// Removes `other` from the neighbour list. Returns `false` if it was not there.
    pub fn unlink(&mut self, other: SpaceId) -> bool {
        match self.neighbors.iter().position(|&n| n == other) {
            Some(pos) => {
                self.neighbors.remove(pos);
                true
            }
            None => false,
        }
    }
}
