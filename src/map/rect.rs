// src/map/rect.rs
// Axis-aligned grid rectangles with direction-relative accessors.

use std::fmt;

/// Orientation of a hall, or of the axis a split cuts.
///
/// A `Horiz` hall runs West-East, and a `Horiz` split cuts the column axis
/// (its cut line runs North-South). For `Horiz` the longitude is the column
/// axis and the latitude the row axis; `Vert` swaps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Horiz,
    Vert,
}

impl Dir {
    /// The perpendicular direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Horiz => Dir::Vert,
            Dir::Vert => Dir::Horiz,
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dir::Horiz => write!(f, "Dir::Horiz"),
            Dir::Vert => write!(f, "Dir::Vert"),
        }
    }
}

/// A half-open rectangle of grid cells: rows `[begin_row, end_row)`,
/// columns `[begin_col, end_col)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub begin_row: i32,
    pub end_row: i32,
    pub begin_col: i32,
    pub end_col: i32,
}

impl Rect {
    pub fn new(begin_row: i32, end_row: i32, begin_col: i32, end_col: i32) -> Self {
        Rect {
            begin_row,
            end_row,
            begin_col,
            end_col,
        }
    }

    pub fn width(&self) -> i32 {
        self.end_col - self.begin_col
    }

    pub fn height(&self) -> i32 {
        self.end_row - self.begin_row
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Ratio of the short side to the long side, in `(0, 1]`.
    pub fn aspect_ratio(&self) -> f64 {
        let (w, h) = (self.width() as f64, self.height() as f64);
        w.min(h) / w.max(h)
    }

    pub fn begin_longitude(&self, dir: Dir) -> i32 {
        match dir {
            Dir::Horiz => self.begin_col,
            Dir::Vert => self.begin_row,
        }
    }

    pub fn end_longitude(&self, dir: Dir) -> i32 {
        match dir {
            Dir::Horiz => self.end_col,
            Dir::Vert => self.end_row,
        }
    }

    pub fn begin_latitude(&self, dir: Dir) -> i32 {
        self.begin_longitude(dir.flip())
    }

    pub fn end_latitude(&self, dir: Dir) -> i32 {
        self.end_longitude(dir.flip())
    }

    pub fn begin_longitude_mut(&mut self, dir: Dir) -> &mut i32 {
        match dir {
            Dir::Horiz => &mut self.begin_col,
            Dir::Vert => &mut self.begin_row,
        }
    }

    pub fn end_longitude_mut(&mut self, dir: Dir) -> &mut i32 {
        match dir {
            Dir::Horiz => &mut self.end_col,
            Dir::Vert => &mut self.end_row,
        }
    }

    pub fn begin_latitude_mut(&mut self, dir: Dir) -> &mut i32 {
        self.begin_longitude_mut(dir.flip())
    }

    pub fn end_latitude_mut(&mut self, dir: Dir) -> &mut i32 {
        self.end_longitude_mut(dir.flip())
    }

    pub fn len_longitude(&self, dir: Dir) -> i32 {
        self.end_longitude(dir) - self.begin_longitude(dir)
    }

    pub fn len_latitude(&self, dir: Dir) -> i32 {
        self.end_latitude(dir) - self.begin_latitude(dir)
    }

    /// Cuts the rectangle across its longitude at `pos`.
    ///
    /// The cut line itself belongs to neither half: the first half ends at
    /// `pos`, the second begins at `pos + 1`, leaving a one-cell gap for the
    /// corridor that later joins them.
    pub fn split(&self, dir: Dir, pos: i32) -> (Rect, Rect) {
        debug_assert!(
            pos > self.begin_longitude(dir) && pos < self.end_longitude(dir) - 1,
            "split position {} outside {} along {}",
            pos,
            self,
            dir
        );
        let mut first = *self;
        let mut second = *self;
        *first.end_longitude_mut(dir) = pos;
        *second.begin_longitude_mut(dir) = pos + 1;
        (first, second)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.begin_row <= other.begin_row
            && self.end_row >= other.end_row
            && self.begin_col <= other.begin_col
            && self.end_col >= other.end_col
    }

    pub fn contains_cell(&self, row: i32, col: i32) -> bool {
        row >= self.begin_row && row < self.end_row && col >= self.begin_col && col < self.end_col
    }

    // Checks if two rectangles share at least one cell
    pub fn intersects(&self, other: &Rect) -> bool {
        self.begin_row < other.end_row
            && other.begin_row < self.end_row
            && self.begin_col < other.end_col
            && other.begin_col < self.end_col
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect{{{}, {}; {}, {}}}",
            self.begin_row, self.end_row, self.begin_col, self.end_col
        )
    }
}
