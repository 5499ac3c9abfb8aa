// src/bsp/bsp_util.rs
// Helper functions specific to the recursive carver.

use crate::bsp::bsp_scratch::Slot;

/// Valid cut positions along one axis of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRange {
    /// Smallest size either half may have.
    pub min: i32,
    /// First valid cut position.
    pub begin: i32,
    /// One past the last valid cut position.
    pub end: i32,
}

impl SplitRange {
    /// Cut positions along `begin..end` that keep both halves at least
    /// `max(min_len + 1, perpendicular * ratio_min)` long, the cut cell
    /// included on the first half's side.
    pub fn new(min_len: i32, perpendicular: i32, ratio_min: f64, begin: i32, end: i32) -> Self {
        // +1 to leave room for the hall.
        let min = (min_len + 1).max((perpendicular as f64 * ratio_min) as i32);
        SplitRange {
            min,
            begin: begin + min,
            end: end - min + 1,
        }
    }

    /// Number of valid positions; never negative.
    pub fn len(&self) -> i32 {
        (self.end - self.begin).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First and last claimed cells of an edge array, both inclusive.
pub fn claimed_bounds(slots: &[Slot]) -> Option<(usize, usize)> {
    let first = slots.iter().position(Option::is_some)?;
    let last = slots.iter().rposition(Option::is_some)?;
    Some((first, last))
}

/// Cells where both facing edges are claimed, as an inclusive window.
pub fn overlap_window(first: &[Slot], second: &[Slot]) -> Option<(usize, usize)> {
    let (a_lo, a_hi) = claimed_bounds(first)?;
    let (b_lo, b_hi) = claimed_bounds(second)?;
    let lo = a_lo.max(b_lo);
    let hi = a_hi.min(b_hi);
    (lo <= hi).then_some((lo, hi))
}
