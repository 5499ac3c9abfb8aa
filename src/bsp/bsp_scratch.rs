// src/bsp/bsp_scratch.rs
// Stack-disciplined scratch pool for the temporary edge arrays of the recursion.

use crate::error::CarveError;
use crate::map::SpaceId;
use std::cell::Cell;
use std::ops::{Deref, DerefMut};

/// One boundary cell: the space that owns it, if any.
pub type Slot = Option<SpaceId>;

/// Preallocated pool of boundary slots.
///
/// Views are carved off the front of the free region and handed out together
/// with a [`ScratchStack`] over what remains, so a nested acquisition can only
/// happen while the outer view is alive and the outer view can only be used
/// again once the nested ones are gone. Release order is therefore LIFO by
/// construction; debug builds additionally check it when views drop.
#[derive(Debug, Default)]
pub struct ScratchArena {
    slots: Vec<Slot>,
    top: Cell<usize>,
    peak: Cell<usize>,
}

impl ScratchArena {
    pub fn with_capacity(capacity: usize) -> Self {
        ScratchArena {
            slots: vec![None; capacity],
            top: Cell::new(0),
            peak: Cell::new(0),
        }
    }

    /// Slots needed by a pass: every split level holds the two inner edges
    /// exposed by its cut, each at most `max(width, height)` long.
    pub fn capacity_for(width: i32, height: i32, depth_max: u32) -> usize {
        let edge = width.max(height).max(0) as usize;
        edge * depth_max.saturating_sub(1) as usize * 2
    }

    pub fn reset(&mut self, capacity: usize) {
        self.slots.clear();
        self.slots.resize(capacity, None);
        self.top.set(0);
        self.peak.set(0);
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots currently held by live views.
    pub fn in_use(&self) -> usize {
        self.top.get()
    }

    /// Highest number of slots held at once since the last reset.
    pub fn peak(&self) -> usize {
        self.peak.get()
    }

    /// The whole pool as an empty stack.
    pub fn stack(&mut self) -> ScratchStack<'_> {
        debug_assert_eq!(self.top.get(), 0, "scratch stack opened while views are live");
        ScratchStack {
            free: &mut self.slots[..],
            offset: 0,
            top: &self.top,
            peak: &self.peak,
        }
    }
}

/// The free tail of the pool at one level of the recursion.
pub struct ScratchStack<'a> {
    free: &'a mut [Slot],
    offset: usize,
    top: &'a Cell<usize>,
    peak: &'a Cell<usize>,
}

impl<'a> ScratchStack<'a> {
    /// Takes `len` cleared slots off the stack.
    ///
    /// Returns the view and the stack of what is left; both borrow `self`, so
    /// `self` is usable again once both are dropped.
    pub fn acquire(&mut self, len: usize) -> Result<(ScratchView<'_>, ScratchStack<'_>), CarveError> {
        if len > self.free.len() {
            return Err(CarveError::ScratchExhausted {
                requested: len,
                available: self.free.len(),
            });
        }
        debug_assert_eq!(self.top.get(), self.offset, "scratch acquired out of order");

        let (view, rest) = self.free.split_at_mut(len);
        view.fill(None);

        let end = self.offset + len;
        self.top.set(end);
        if end > self.peak.get() {
            self.peak.set(end);
        }

        Ok((
            ScratchView {
                slots: view,
                offset: self.offset,
                top: self.top,
            },
            ScratchStack {
                free: rest,
                offset: end,
                top: self.top,
                peak: self.peak,
            },
        ))
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// A scoped slice of the pool, released on drop.
pub struct ScratchView<'a> {
    slots: &'a mut [Slot],
    offset: usize,
    top: &'a Cell<usize>,
}

impl Deref for ScratchView<'_> {
    type Target = [Slot];

    fn deref(&self) -> &[Slot] {
        self.slots
    }
}

impl DerefMut for ScratchView<'_> {
    fn deref_mut(&mut self) -> &mut [Slot] {
        self.slots
    }
}

impl Drop for ScratchView<'_> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.top.get(),
            self.offset + self.slots.len(),
            "scratch view released out of order"
        );
        self.top.set(self.offset);
    }
}
