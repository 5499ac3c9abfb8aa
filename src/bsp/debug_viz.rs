// src/bsp/debug_viz.rs

//! Text dumps of a carved space graph: a tile grid for eyeballing layouts and
//! a Graphviz description of the adjacency graph.

use crate::map::{Dir, Rect, Space, SpaceKind};
use std::fmt::Write;

pub const WALL_TILE: char = '#';
pub const ROOM_TILE: char = '.';
pub const HORIZ_HALL_TILE: char = '-';
pub const VERT_HALL_TILE: char = '|';

/// Graphviz points per grid cell.
const DOT_SCALE: i32 = 72;

fn tile_for(space: &Space) -> char {
    match &space.kind {
        SpaceKind::Room(_) => ROOM_TILE,
        SpaceKind::Hall(hall) => match hall.dir {
            Dir::Horiz => HORIZ_HALL_TILE,
            Dir::Vert => VERT_HALL_TILE,
        },
    }
}

/// One string per row. Cells outside `num_rows` x `num_cols` are dropped.
pub fn render_tiles(num_rows: i32, num_cols: i32, spaces: &[Space]) -> Vec<String> {
    let rows = num_rows.max(0) as usize;
    let cols = num_cols.max(0) as usize;
    let mut grid = vec![vec![WALL_TILE; cols]; rows];
    let bounds = Rect::new(0, num_rows, 0, num_cols);

    for space in spaces {
        let shape = space.shape();
        let tile = tile_for(space);
        for r in shape.begin_row.max(0)..shape.end_row.min(num_rows) {
            for c in shape.begin_col.max(0)..shape.end_col.min(num_cols) {
                debug_assert!(bounds.contains_cell(r, c));
                grid[r as usize][c as usize] = tile;
            }
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

/// Graphviz `graph` with one node per space and one edge per adjacency.
pub fn render_dot(spaces: &[Space]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dot(&mut out, spaces);
    out
}

fn write_dot<W: Write>(out: &mut W, spaces: &[Space]) -> std::fmt::Result {
    writeln!(out, "graph g {{")?;
    for (i, space) in spaces.iter().enumerate() {
        let rect = space.shape();
        let label = if space.is_room() { "Room" } else { "Hall" };
        writeln!(
            out,
            "    {} [label=\"{} {}-{}:{}-{}\" pos=\"{},{}\" ];",
            i,
            label,
            rect.begin_row,
            rect.end_row,
            rect.begin_col,
            rect.end_col,
            (rect.begin_col + rect.end_col) * DOT_SCALE / 2,
            (rect.begin_row + rect.end_row) * DOT_SCALE / 2,
        )?;
        for neighbor in &space.neighbors {
            if i < neighbor.index() {
                writeln!(out, "    {} -- {};", i, neighbor.index())?;
            }
        }
    }
    writeln!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Hall, SpaceId};

    fn two_rooms_and_a_hall() -> Vec<Space> {
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
        spaces
    }

    #[test]
    fn test_render_tiles() {
        let tiles = render_tiles(4, 7, &two_rooms_and_a_hall());
        assert_eq!(tiles, vec!["...#...", "...-...", "...#...", "#######"]);
    }

    #[test]
    fn test_vertical_hall_tile() {
        let spaces = vec![Space::hall(Hall {
            dir: Dir::Vert,
            offset: 1,
            begin: 0,
            end: 2,
            thickness: 1,
        })];
        assert_eq!(render_tiles(2, 3, &spaces), vec!["#|#", "#|#"]);
    }

    #[test]
    fn test_render_tiles_clips_to_the_grid() {
        let spaces = vec![Space::room(Rect::new(1, 9, 1, 9))];
        assert_eq!(render_tiles(3, 3, &spaces), vec!["###", "#..", "#.."]);
    }

    #[test]
    fn test_render_dot() {
        let dot = render_dot(&two_rooms_and_a_hall());
        let lines: Vec<&str> = dot.lines().collect();
        assert_eq!(lines[0], "graph g {");
        assert_eq!(lines[1], "    0 [label=\"Room 0-3:0-3\" pos=\"108,108\" ];");
        assert_eq!(lines[2], "    0 -- 1;");
        assert_eq!(lines[3], "    1 [label=\"Hall 1-2:3-4\" pos=\"252,108\" ];");
        assert_eq!(lines[4], "    1 -- 2;");
        assert_eq!(lines[5], "    2 [label=\"Room 0-3:4-7\" pos=\"396,108\" ];");
        assert_eq!(*lines.last().unwrap(), "}");
        assert_eq!(dot.matches(" -- ").count(), 2);
    }
}
