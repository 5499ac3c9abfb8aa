// tests/generation.rs

use dungeon_carve::bsp::Edge;
use dungeon_carve::{
    Carver, CarverConfig, Dungeon, GenerateError, Rect, Space, SpaceId, SpaceKind,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn carve(width: i32, height: i32, seed: u64) -> Dungeon {
    let mut carver = Carver::with_seed(CarverConfig::default(), seed).unwrap();
    carver.generate(width, height).unwrap()
}

/// Whether two shapes touch along an edge without overlapping.
fn share_an_edge(a: &Rect, b: &Rect) -> bool {
    let rows_overlap = a.begin_row < b.end_row && b.begin_row < a.end_row;
    let cols_overlap = a.begin_col < b.end_col && b.begin_col < a.end_col;
    (rows_overlap && (a.end_col == b.begin_col || b.end_col == a.begin_col))
        || (cols_overlap && (a.end_row == b.begin_row || b.end_row == a.begin_row))
}

fn assert_sound(dungeon: &Dungeon) {
    let bounds = Rect::new(0, dungeon.num_rows(), 0, dungeon.num_cols());
    let shapes: Vec<Rect> = dungeon.spaces().iter().map(Space::shape).collect();

    assert!(dungeon.is_connected(), "dungeon has isolated areas");
    for (i, a) in shapes.iter().enumerate() {
        assert!(!a.is_empty(), "space #{} is empty", i);
        assert!(bounds.contains(a), "{} leaves the grid", a);
        for b in &shapes[i + 1..] {
            assert!(!a.intersects(b), "{} overlaps {}", a, b);
        }
    }

    for id in dungeon.ids() {
        for &other in dungeon.neighbors(id) {
            assert!(
                dungeon.neighbors(other).contains(&id),
                "{} -> {} is one-way",
                id,
                other
            );
            assert!(
                share_an_edge(&dungeon.shape(id), &dungeon.shape(other)),
                "{} and {} are linked but not adjacent",
                id,
                other
            );
        }
    }
}

/// Each hall has exactly two neighbours, both rooms, one past each end.
fn assert_hall_ends(dungeon: &Dungeon) {
    for id in dungeon.ids() {
        let space = &dungeon.spaces()[id.index()];
        let SpaceKind::Hall(hall) = space.kind else {
            continue;
        };
        assert_eq!(space.neighbors.len(), 2, "hall {} has {:?}", id, space.neighbors);
        let mut near = 0;
        let mut far = 0;
        for &n in &space.neighbors {
            let other = &dungeon.spaces()[n.index()];
            assert!(other.is_room(), "hall {} touches hall {}", id, n);
            let shape = other.shape();
            if shape.end_longitude(hall.dir) == hall.begin {
                near += 1;
            }
            if shape.begin_longitude(hall.dir) == hall.end {
                far += 1;
            }
        }
        assert_eq!((near, far), (1, 1), "hall {} ends", id);
    }
}

#[test]
fn test_thirty_by_thirty_is_reproducible() {
    let first = carve(30, 30, 1234);
    let second = carve(30, 30, 1234);
    assert_eq!(first.tiles(), second.tiles());
    assert_eq!(first.tiles().len(), 30);
    assert!(first.tiles().iter().all(|row| row.len() == 30));
}

#[test]
fn test_reseeding_replays_the_sequence() {
    let mut carver = Carver::with_seed(CarverConfig::default(), 7).unwrap();
    let first = carver.generate(50, 25).unwrap();
    let _ = carver.generate(50, 25).unwrap();
    carver.seed(7);
    assert_eq!(carver.generate(50, 25).unwrap().to_dot(), first.to_dot());
}

#[test]
fn test_three_by_three_is_too_small() {
    let mut carver = Carver::with_seed(CarverConfig::default(), 0).unwrap();
    let err = carver.generate(3, 3).unwrap_err();
    assert!(matches!(err, GenerateError::TooSmall { .. }));
    assert!(err.to_string().contains("too small"));
}

#[test]
fn test_large_dungeon_is_sound() {
    let dungeon = carve(120, 60, 99);
    assert_sound(&dungeon);
    assert_hall_ends(&dungeon);
    let stats = dungeon.stats();
    assert!(stats.rooms > 10);
    // One corridor per split; a junction may have swallowed a whole hall.
    assert!(stats.halls + stats.junctions >= stats.rooms - 1);
}

#[test]
fn test_boundary_is_complete_and_accurate() {
    let dungeon = carve(64, 48, 5);
    let boundary = dungeon.boundary();
    assert!(boundary.is_complete());

    for col in 0..dungeon.num_cols() {
        let north = boundary.owner(Edge::North, col as usize).unwrap();
        let south = boundary.owner(Edge::South, col as usize).unwrap();
        let covering: Vec<Rect> = dungeon
            .spaces()
            .iter()
            .map(Space::shape)
            .filter(|s| s.begin_col <= col && col < s.end_col)
            .collect();
        let top = covering.iter().map(|s| s.begin_row).min().unwrap();
        let bottom = covering.iter().map(|s| s.end_row).max().unwrap();
        assert_eq!(dungeon.shape(north).begin_row, top, "north owner of column {}", col);
        assert_eq!(dungeon.shape(south).end_row, bottom, "south owner of column {}", col);
    }

    for row in 0..dungeon.num_rows() {
        let west = boundary.owner(Edge::West, row as usize).unwrap();
        let east = boundary.owner(Edge::East, row as usize).unwrap();
        assert!(dungeon.shape(west).contains_cell(row, dungeon.shape(west).begin_col));
        let covering: Vec<Rect> = dungeon
            .spaces()
            .iter()
            .map(Space::shape)
            .filter(|s| s.begin_row <= row && row < s.end_row)
            .collect();
        let left = covering.iter().map(|s| s.begin_col).min().unwrap();
        let right = covering.iter().map(|s| s.end_col).max().unwrap();
        assert_eq!(dungeon.shape(west).begin_col, left, "west owner of row {}", row);
        assert_eq!(dungeon.shape(east).end_col, right, "east owner of row {}", row);
    }
}

#[test]
fn test_scaling_keeps_topology() {
    let mut dungeon = carve(40, 30, 21);
    let links: Vec<BTreeSet<SpaceId>> = dungeon
        .ids()
        .map(|id| dungeon.neighbors(id).iter().copied().collect())
        .collect();
    let before = dungeon.stats();

    dungeon.scale(3).unwrap();
    assert_eq!(dungeon.num_cols(), 40 * 3 - 2);
    assert_eq!(dungeon.num_rows(), 30 * 3 - 2);
    assert_sound(&dungeon);
    assert_hall_ends(&dungeon);
    let grid = Rect::new(0, dungeon.num_rows(), 0, dungeon.num_cols());
    assert_eq!(dungeon.boundary().rect(), grid);
    assert_eq!(dungeon.boundary().edge(Edge::North).len(), 118);
    for row in 0..dungeon.num_rows() {
        if let Some(west) = dungeon.boundary().owner(Edge::West, row as usize) {
            assert!(dungeon.shape(west).contains_cell(row, dungeon.shape(west).begin_col));
        }
    }

    let after: Vec<BTreeSet<SpaceId>> = dungeon
        .ids()
        .map(|id| dungeon.neighbors(id).iter().copied().collect())
        .collect();
    assert_eq!(links, after);
    let stats = dungeon.stats();
    assert_eq!(stats.rooms, before.rooms);
    assert_eq!(stats.junctions, before.junctions);
    assert_eq!(stats.halls, before.halls);
}

#[test]
fn test_space_at_agrees_with_tiles() {
    let dungeon = carve(45, 20, 3);
    let tiles = dungeon.tiles();
    for (row, line) in tiles.iter().enumerate() {
        for (col, tile) in line.chars().enumerate() {
            let found = dungeon.space_at(row as i32, col as i32);
            assert_eq!(found.is_some(), tile != '#', "cell ({}, {})", row, col);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_dungeons_are_sound(
        width in 4i32..90,
        height in 4i32..90,
        seed in any::<u64>(),
    ) {
        let dungeon = carve(width, height, seed);
        assert_sound(&dungeon);
        assert_hall_ends(&dungeon);
        prop_assert!(dungeon.boundary().is_complete());
    }

    #[test]
    fn prop_rooms_respect_the_minima(
        size in 12i32..100,
        stretch in 0i32..5,
        seed in any::<u64>(),
    ) {
        let config = CarverConfig::default();
        let (width, height) = (size + stretch, size);
        let dungeon = carve(width, height, seed);
        for space in dungeon.spaces() {
            let SpaceKind::Room(rect) = space.kind else { continue };
            if space.is_junction() {
                continue;
            }
            prop_assert!(rect.width() >= config.room_width_min, "{}", rect);
            prop_assert!(rect.height() >= config.room_height_min, "{}", rect);
            // Cuts round the ratio bound down and give up one cell to the hall.
            let short = rect.width().min(rect.height()) as f64;
            let long = rect.width().max(rect.height()) as f64;
            prop_assert!(short + 2.0 > config.room_ratio_min * long, "{}", rect);
        }
    }
}
