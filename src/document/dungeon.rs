// src/document/dungeon.rs

use crate::bsp::debug_viz::{render_dot, render_tiles};
use crate::bsp::Boundary;
use crate::error::TransformError;
use crate::map::{Hall, Rect, Space, SpaceId, SpaceKind};
use std::collections::VecDeque;
use std::fmt;

/// Counts over the spaces of a dungeon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DungeonStats {
    /// Rooms other than junctions.
    pub rooms: usize,
    pub junctions: usize,
    pub halls: usize,
    /// Cells covered by any space.
    pub covered_cells: i64,
}

/// The finished product of a generation pass: a connected graph of rooms and
/// halls over a `num_rows` x `num_cols` grid.
#[derive(Debug, Clone)]
pub struct Dungeon {
    width: i32,
    height: i32,
    spaces: Vec<Space>,
    boundary: Boundary,
}

impl Dungeon {
    pub(crate) fn new(width: i32, height: i32, spaces: Vec<Space>, boundary: Boundary) -> Self {
        Dungeon {
            width,
            height,
            spaces,
            boundary,
        }
    }

    pub fn num_rows(&self) -> i32 {
        self.height
    }

    pub fn num_cols(&self) -> i32 {
        self.width
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn space(&self, id: SpaceId) -> Option<&Space> {
        self.spaces.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = SpaceId> {
        (0..self.spaces.len()).map(SpaceId::new)
    }

    /// Neighbours of `id`; empty for an unknown id.
    pub fn neighbors(&self, id: SpaceId) -> &[SpaceId] {
        match self.space(id) {
            Some(space) => &space.neighbors,
            None => &[],
        }
    }

    /// Occupied cells of `id`; an empty rect for an unknown id.
    pub fn shape(&self, id: SpaceId) -> Rect {
        self.space(id).map(Space::shape).unwrap_or_default()
    }

    /// Edge owners of the whole grid. The transforms rebuild it for the
    /// grid they leave behind.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn stats(&self) -> DungeonStats {
        let mut stats = DungeonStats::default();
        for space in &self.spaces {
            match space.kind {
                SpaceKind::Room(_) if space.is_junction() => stats.junctions += 1,
                SpaceKind::Room(_) => stats.rooms += 1,
                SpaceKind::Hall(_) => stats.halls += 1,
            }
            stats.covered_cells += space.shape().area();
        }
        stats
    }

    /// The space covering cell (`row`, `col`), if any.
    pub fn space_at(&self, row: i32, col: i32) -> Option<SpaceId> {
        self.spaces
            .iter()
            .position(|space| space.shape().contains_cell(row, col))
            .map(SpaceId::new)
    }

    // --- Graph queries ---

    /// Connected components of the adjacency graph, each sorted by id.
    pub fn components(&self) -> Vec<Vec<SpaceId>> {
        let mut seen = vec![false; self.spaces.len()];
        let mut components = Vec::new();
        let mut queue = VecDeque::new();

        for start in 0..self.spaces.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            queue.push_back(SpaceId::new(start));
            let mut component = Vec::new();
            while let Some(id) = queue.pop_front() {
                component.push(id);
                for &next in self.neighbors(id) {
                    if let Some(flag) = seen.get_mut(next.index()) {
                        if !*flag {
                            *flag = true;
                            queue.push_back(next);
                        }
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    pub fn is_connected(&self) -> bool {
        self.components().len() == 1
    }

    // --- Rendering ---

    /// One string per row: `#` wall, `.` room, `-` and `|` halls.
    pub fn tiles(&self) -> Vec<String> {
        render_tiles(self.height, self.width, &self.spaces)
    }

    pub fn to_dot(&self) -> String {
        render_dot(&self.spaces)
    }

    // --- Transforms ---

    /// Scales every coordinate by `x`. The grid becomes `dim * x - x + 1`
    /// cells wide, which leaves shapes spilling past it until
    /// `sub(x - 1)` trims them back. Nothing changes on error.
    pub fn mult(&mut self, x: i32) -> Result<(), TransformError> {
        if x < 1 {
            return Err(TransformError::BadFactor(x));
        }
        let grow = |dim: i32| {
            dim.checked_mul(x)
                .and_then(|d| d.checked_sub(x - 1))
                .ok_or(TransformError::Overflow(x))
        };
        let width = grow(self.width)?;
        let height = grow(self.height)?;

        let times = |v: i32| v.checked_mul(x).ok_or(TransformError::Overflow(x));
        let kinds = self
            .spaces
            .iter()
            .map(|space| -> Result<SpaceKind, TransformError> {
                Ok(match space.kind {
                    SpaceKind::Room(rect) => SpaceKind::Room(Rect::new(
                        times(rect.begin_row)?,
                        times(rect.end_row)?,
                        times(rect.begin_col)?,
                        times(rect.end_col)?,
                    )),
                    SpaceKind::Hall(hall) => SpaceKind::Hall(Hall {
                        begin: times(hall.begin)?,
                        end: times(hall.end)?,
                        offset: times(hall.offset)?,
                        thickness: times(hall.thickness)?,
                        ..hall
                    }),
                })
            })
            .collect::<Result<Vec<_>, TransformError>>()?;

        self.width = width;
        self.height = height;
        for (space, kind) in self.spaces.iter_mut().zip(kinds) {
            space.kind = kind;
        }
        self.rebuild_boundary();
        Ok(())
    }

    /// Rooms give up `x` trailing rows and columns; halls stretch back by
    /// `x` to meet them and get `x` thinner. Nothing changes on error.
    pub fn sub(&mut self, x: i32) -> Result<(), TransformError> {
        if x < 0 {
            return Err(TransformError::BadAmount(x));
        }
        for (i, space) in self.spaces.iter().enumerate() {
            let empty = match &space.kind {
                SpaceKind::Room(rect) => rect.width() <= x || rect.height() <= x,
                SpaceKind::Hall(hall) => hall.thickness <= x,
            };
            if empty {
                return Err(TransformError::Degenerate {
                    amount: x,
                    space: SpaceId::new(i),
                });
            }
        }

        self.width -= x;
        self.height -= x;
        for space in &mut self.spaces {
            match &mut space.kind {
                SpaceKind::Room(rect) => {
                    rect.end_row -= x;
                    rect.end_col -= x;
                }
                SpaceKind::Hall(hall) => {
                    hall.begin -= x;
                    hall.thickness -= x;
                }
            }
        }
        self.rebuild_boundary();
        Ok(())
    }

    /// `mult(x)` followed by `sub(x - 1)`: the layout spread out by `x` with
    /// `x - 1` wall cells between neighbouring rooms and one-cell halls.
    ///
    /// The grid keeps the size `mult` gave it, which is exactly what the
    /// trimmed shapes span.
    pub fn scale(&mut self, x: i32) -> Result<(), TransformError> {
        self.mult(x)?;
        let (width, height) = (self.width, self.height);
        self.sub(x - 1)?;
        self.width = width;
        self.height = height;
        self.rebuild_boundary();
        Ok(())
    }

    fn rebuild_boundary(&mut self) {
        let grid = Rect::new(0, self.height, 0, self.width);
        self.boundary = Boundary::from_spaces(grid, &self.spaces);
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::Edge;
    use crate::map::Dir;

    /// Two 3x3 rooms joined by a one-cell hall on row 1.
    fn small_dungeon() -> Dungeon {
        let mut spaces = vec![
            Space::room(Rect::new(0, 3, 0, 3)),
            Space::hall(Hall {
                dir: Dir::Horiz,
                offset: 1,
                begin: 3,
                end: 4,
                thickness: 1,
            }),
            Space::room(Rect::new(0, 3, 4, 7)),
        ];
        spaces[0].neighbors.push(SpaceId::new(1));
        spaces[1].neighbors.extend([SpaceId::new(0), SpaceId::new(2)]);
        spaces[2].neighbors.push(SpaceId::new(1));
        Dungeon::new(7, 3, spaces, Boundary::new(Rect::new(0, 3, 0, 7)))
    }

    #[test]
    fn test_accessors() {
        let dungeon = small_dungeon();
        assert_eq!(dungeon.num_rows(), 3);
        assert_eq!(dungeon.num_cols(), 7);
        assert_eq!(dungeon.ids().count(), 3);
        assert_eq!(dungeon.neighbors(SpaceId::new(1)).len(), 2);
        assert!(dungeon.neighbors(SpaceId::new(9)).is_empty());
        assert_eq!(dungeon.shape(SpaceId::new(2)), Rect::new(0, 3, 4, 7));
        assert_eq!(dungeon.shape(SpaceId::new(9)), Rect::default());
    }

    #[test]
    fn test_stats() {
        let stats = small_dungeon().stats();
        assert_eq!(
            stats,
            DungeonStats {
                rooms: 2,
                junctions: 0,
                halls: 1,
                covered_cells: 19,
            }
        );
    }

    #[test]
    fn test_space_at() {
        let dungeon = small_dungeon();
        assert_eq!(dungeon.space_at(1, 3), Some(SpaceId::new(1)));
        assert_eq!(dungeon.space_at(2, 6), Some(SpaceId::new(2)));
        assert_eq!(dungeon.space_at(0, 3), None);
        assert_eq!(dungeon.space_at(-1, 0), None);
    }

    #[test]
    fn test_components() {
        let mut dungeon = small_dungeon();
        assert!(dungeon.is_connected());

        dungeon.spaces[1].neighbors.retain(|&n| n != SpaceId::new(2));
        dungeon.spaces[2].neighbors.clear();
        let components = dungeon.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0], vec![SpaceId::new(0), SpaceId::new(1)]);
        assert_eq!(components[1], vec![SpaceId::new(2)]);
        assert!(!dungeon.is_connected());
    }

    #[test]
    fn test_display_matches_tiles() {
        let dungeon = small_dungeon();
        assert_eq!(dungeon.to_string(), "...#...\n...-...\n...#...\n");
    }

    #[test]
    fn test_mult() {
        let mut dungeon = small_dungeon();
        dungeon.mult(2).unwrap();
        assert_eq!(dungeon.num_cols(), 13);
        assert_eq!(dungeon.num_rows(), 5);
        assert_eq!(dungeon.shape(SpaceId::new(0)), Rect::new(0, 6, 0, 6));
        assert_eq!(dungeon.shape(SpaceId::new(1)), Rect::new(2, 4, 6, 8));
        assert_eq!(dungeon.mult(0), Err(TransformError::BadFactor(0)));
    }

    #[test]
    fn test_mult_rejects_overflow() {
        let mut dungeon = small_dungeon();
        let before = dungeon.spaces().to_vec();
        let factor = i32::MAX / 4;
        assert_eq!(dungeon.mult(factor), Err(TransformError::Overflow(factor)));
        assert_eq!(dungeon.spaces(), &before[..]);
        assert_eq!((dungeon.num_rows(), dungeon.num_cols()), (3, 7));
        assert_eq!(dungeon.scale(i32::MAX), Err(TransformError::Overflow(i32::MAX)));
        assert_eq!(dungeon.spaces(), &before[..]);
    }

    #[test]
    fn test_scale_keeps_walls_between_rooms() {
        let mut dungeon = small_dungeon();
        dungeon.scale(3).unwrap();
        assert_eq!(dungeon.num_cols(), 19);
        assert_eq!(dungeon.num_rows(), 7);
        assert_eq!(dungeon.shape(SpaceId::new(0)), Rect::new(0, 7, 0, 7));
        assert_eq!(dungeon.shape(SpaceId::new(1)), Rect::new(3, 4, 7, 12));
        assert_eq!(dungeon.shape(SpaceId::new(2)), Rect::new(0, 7, 12, 19));
        assert_eq!(dungeon.tiles()[3], ".......-----.......");
        assert_eq!(dungeon.tiles()[0], ".......#####.......");

        let boundary = dungeon.boundary();
        assert_eq!(boundary.rect(), Rect::new(0, 7, 0, 19));
        assert!(boundary.is_complete());
        assert_eq!(boundary.owner(Edge::North, 9), Some(SpaceId::new(1)));
        assert_eq!(boundary.owner(Edge::South, 0), Some(SpaceId::new(0)));
        assert_eq!(boundary.owner(Edge::East, 6), Some(SpaceId::new(2)));
    }

    #[test]
    fn test_sub_rejects_degenerate_shapes() {
        let mut dungeon = small_dungeon();
        let before = dungeon.spaces().to_vec();
        assert_eq!(
            dungeon.sub(1),
            Err(TransformError::Degenerate {
                amount: 1,
                space: SpaceId::new(1),
            })
        );
        assert_eq!(dungeon.spaces(), &before[..]);
        assert_eq!(dungeon.num_cols(), 7);
        assert_eq!(dungeon.sub(-2), Err(TransformError::BadAmount(-2)));
        assert!(dungeon.sub(0).is_ok());
    }
}
