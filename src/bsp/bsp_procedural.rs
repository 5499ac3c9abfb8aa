// src/bsp/bsp_procedural.rs

use crate::bsp::bsp_arena::SpaceArena;
use crate::bsp::bsp_boundary::{Boundary, BoundaryIndex};
use crate::bsp::bsp_scratch::{ScratchArena, ScratchStack, Slot};
use crate::bsp::bsp_util::{overlap_window, SplitRange};
use crate::bsp::DEFAULT_DEPTH_MAX;
use crate::document::Dungeon;
use crate::error::{CarveError, ConfigError, GenerateError};
use crate::map::{Dir, Hall, Rect, Space, SpaceId, SpaceKind};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Recursive dungeon carver.
///
/// Owns the PRNG and the memory reused by every pass; each call to
/// [`Carver::generate`] resets both pools and hands back an independent
/// [`Dungeon`].
pub struct Carver {
    config: CarverConfig,
    rng: StdRng,
    spaces: SpaceArena,
    scratch: ScratchArena,
    stats: Option<GenerationStats>,
}

/// Tunables of the carver. All of them are part of the reproducibility
/// contract: same seed, size and config give the same dungeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarverConfig {
    pub room_width_min: i32,
    pub room_height_min: i32,
    /// Lower bound on the short side over the long side of a region.
    pub room_ratio_min: f64,
    /// Recursion levels, the root included. A region at this depth is
    /// always a leaf room.
    pub depth_max: u32,
}

#[derive(Default, Debug, Clone)]
pub struct GenerationStats {
    pub generation_time: f64,
    pub split_count: usize,
    pub room_count: usize,
    pub junction_count: usize,
    pub hall_count: usize,
    pub space_count: usize,
    pub arena_capacity: usize,
    pub scratch_peak: usize,
    pub scratch_capacity: usize,
}

/// Result of cutting a hall around one of its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunctionSplit {
    /// The 1x1 room at the cut cell.
    pub junction: SpaceId,
    /// The piece past the cut, if the cut was not the hall's last cell.
    pub new_hall: Option<SpaceId>,
}

impl Default for CarverConfig {
    fn default() -> Self {
        CarverConfig {
            room_width_min: 3,
            room_height_min: 3,
            room_ratio_min: 0.3,
            depth_max: DEFAULT_DEPTH_MAX,
        }
    }
}

impl CarverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_width_min < 1 {
            return Err(ConfigError::RoomTooSmall {
                field: "room_width_min",
                value: self.room_width_min,
            });
        }
        if self.room_height_min < 1 {
            return Err(ConfigError::RoomTooSmall {
                field: "room_height_min",
                value: self.room_height_min,
            });
        }
        // Written so that NaN is rejected too.
        if !(self.room_ratio_min > 0.0 && self.room_ratio_min <= 1.0) {
            return Err(ConfigError::BadRatio(self.room_ratio_min));
        }
        if !(2..=24).contains(&self.depth_max) {
            return Err(ConfigError::BadDepth(self.depth_max));
        }
        Ok(())
    }

    /// Parses a JSON object; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CarverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for Carver {
    fn default() -> Self {
        Carver::build(CarverConfig::default(), StdRng::from_os_rng())
    }
}

impl Carver {
    /// A carver seeded from the operating system.
    pub fn new(config: CarverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Carver::build(config, StdRng::from_os_rng()))
    }

    pub fn with_seed(config: CarverConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Carver::build(config, StdRng::seed_from_u64(seed)))
    }

    fn build(config: CarverConfig, rng: StdRng) -> Self {
        Carver {
            config,
            rng,
            spaces: SpaceArena::default(),
            scratch: ScratchArena::default(),
            stats: None,
        }
    }

    /// Restarts the random sequence.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &CarverConfig {
        &self.config
    }

    /// Statistics of the last successful pass.
    pub fn stats(&self) -> Option<&GenerationStats> {
        self.stats.as_ref()
    }

    /// Spaces of the last pass, successful or not.
    pub fn spaces(&self) -> &[Space] {
        self.spaces.as_slice()
    }

    /// Carves a connected dungeon covering `height` rows and `width` columns.
    pub fn generate(&mut self, width: i32, height: i32) -> Result<Dungeon, GenerateError> {
        let config = &self.config;
        if width <= config.room_width_min || height <= config.room_height_min {
            return Err(GenerateError::TooSmall {
                width,
                height,
                min_width: config.room_width_min,
                min_height: config.room_height_min,
            });
        }

        let start_time = Instant::now();
        let arena_capacity = SpaceArena::capacity_for(width, height, config.depth_max);
        let scratch_capacity = ScratchArena::capacity_for(width, height, config.depth_max);
        self.spaces.reset(arena_capacity);
        self.scratch.reset(scratch_capacity);
        self.stats = None;

        let rect = Rect::new(0, height, 0, width);
        let mut boundary = Boundary::new(rect);
        let mut stats = GenerationStats {
            arena_capacity,
            scratch_capacity,
            ..GenerationStats::default()
        };

        let result = {
            let Carver {
                config,
                rng,
                spaces,
                scratch,
                ..
            } = &mut *self;
            let mut pass = CarvePass {
                config,
                rng,
                spaces,
                stats: &mut stats,
            };
            let mut stack = scratch.stack();
            let mut root = boundary.index();
            pass.carve_region(&mut root, &mut stack, 1).and_then(|()| {
                if root.is_complete() {
                    Ok(())
                } else {
                    Err(CarveError::IncompleteBoundary { rect })
                }
            })
        };

        if let Err(e) = result {
            warn!("Aborted {}x{} pass: {}", width, height, e);
            return Err(e.into());
        }

        let spaces = self.spaces.as_slice().to_vec();
        stats.space_count = spaces.len();
        stats.scratch_peak = self.scratch.peak();
        stats.generation_time = start_time.elapsed().as_secs_f64();
        debug!(
            "Carved {}x{} dungeon: {} spaces ({} rooms, {} junctions, {} halls) from {} splits in {:.3}ms, arena {}/{}, scratch {}/{}",
            width,
            height,
            stats.space_count,
            stats.room_count,
            stats.junction_count,
            stats.hall_count,
            stats.split_count,
            stats.generation_time * 1000.0,
            stats.space_count,
            stats.arena_capacity,
            stats.scratch_peak,
            stats.scratch_capacity,
        );
        self.stats = Some(stats);

        Ok(Dungeon::new(width, height, spaces, boundary))
    }
}

/// Progress of one region through `carve_region`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegionState {
    Splitting,
    LeafRoom,
    Done,
}

/// Borrowed state of one generation pass.
struct CarvePass<'a> {
    config: &'a CarverConfig,
    rng: &'a mut StdRng,
    spaces: &'a mut SpaceArena,
    stats: &'a mut GenerationStats,
}

impl CarvePass<'_> {
    /// Fills `area` with a connected set of spaces and registers them on its
    /// boundary. On success every cell of the boundary is claimed.
    fn carve_region(
        &mut self,
        area: &mut BoundaryIndex<'_>,
        stack: &mut ScratchStack<'_>,
        depth: u32,
    ) -> Result<(), CarveError> {
        let first = self.spaces.len();
        let mut state = if depth < self.config.depth_max {
            RegionState::Splitting
        } else {
            RegionState::LeafRoom
        };

        loop {
            state = match state {
                RegionState::Splitting => match self.try_split(area.rect()) {
                    Some((dir, pos)) => {
                        self.carve_split(area, stack, depth, dir, pos)?;
                        RegionState::Done
                    }
                    None => RegionState::LeafRoom,
                },
                RegionState::LeafRoom => {
                    self.carve_leaf(area)?;
                    RegionState::Done
                }
                RegionState::Done => break,
            };
        }

        area.set_spaces(first..self.spaces.len());
        Ok(())
    }

    /// Picks a cut uniformly among every valid position on both axes.
    fn try_split(&mut self, rect: Rect) -> Option<(Dir, i32)> {
        let ratio = self.config.room_ratio_min;
        let rows = SplitRange::new(
            self.config.room_height_min,
            rect.width(),
            ratio,
            rect.begin_row,
            rect.end_row,
        );
        let cols = SplitRange::new(
            self.config.room_width_min,
            rect.height(),
            ratio,
            rect.begin_col,
            rect.end_col,
        );

        let total = rows.len() + cols.len();
        if total == 0 {
            return None;
        }
        let roll = self.rng.random_range(0..total);
        if roll < rows.len() {
            Some((Dir::Vert, rows.begin + roll))
        } else {
            Some((Dir::Horiz, cols.begin + roll - rows.len()))
        }
    }

    fn carve_leaf(&mut self, area: &mut BoundaryIndex<'_>) -> Result<(), CarveError> {
        let rect = area.rect();
        let id = self.spaces.push(Space::room(rect))?;
        area.claim(&*self.spaces, id);
        self.stats.room_count += 1;
        trace!("Leaf room {} at {}", id, rect);
        Ok(())
    }

    fn carve_split(
        &mut self,
        area: &mut BoundaryIndex<'_>,
        stack: &mut ScratchStack<'_>,
        depth: u32,
        dir: Dir,
        pos: i32,
    ) -> Result<(), CarveError> {
        let rect = area.rect();
        trace!("Split {} along {} at {} (depth {})", rect, dir, pos, depth);
        self.stats.split_count += 1;

        let inner_len = rect.len_latitude(dir) as usize;
        let (mut first_far, mut rest) = stack.acquire(inner_len)?;
        let (mut second_near, mut rest) = rest.acquire(inner_len)?;
        {
            let (mut first, mut second) = area.split(dir, pos, &mut first_far, &mut second_near);
            self.carve_region(&mut first, &mut rest, depth + 1)?;
            self.carve_region(&mut second, &mut rest, depth + 1)?;
            trace!(
                "Halves of {} hold {} and {} spaces",
                rect,
                first.spaces().len(),
                second.spaces().len()
            );
        }

        let carved = self.carve_hallway(rect, dir, &first_far, &second_near)?;
        for id in carved {
            area.claim(&*self.spaces, id);
        }
        Ok(())
    }

    /// Joins the two halves of `rect` with a corridor across the cut.
    ///
    /// Returns every space created or reshaped by the stitch, corridor first.
    fn carve_hallway(
        &mut self,
        rect: Rect,
        dir: Dir,
        first_far: &[Slot],
        second_near: &[Slot],
    ) -> Result<Vec<SpaceId>, CarveError> {
        let (lo, hi) =
            overlap_window(first_far, second_near).ok_or(CarveError::EmptyOverlap { rect })?;
        let loc = self.rng.random_range(lo..=hi);
        let (first, second) = match (first_far[loc], second_near[loc]) {
            (Some(first), Some(second)) => (first, second),
            _ => return Err(CarveError::EmptyOverlap { rect }),
        };

        let hall = Hall {
            dir,
            offset: rect.begin_latitude(dir) + loc as i32,
            begin: self.spaces[first].shape().end_longitude(dir),
            end: self.spaces[second].shape().begin_longitude(dir),
            thickness: 1,
        };
        let corridor = self.spaces.push(Space::hall(hall))?;
        self.stats.hall_count += 1;
        trace!("Corridor {} {:?} joining {} and {}", corridor, hall, first, second);

        let mut carved = Vec::with_capacity(5);
        carved.push(corridor);
        self.connect(corridor, &hall, first, &mut carved)?;
        self.connect(corridor, &hall, second, &mut carved)?;
        Ok(carved)
    }

    /// Links one end of `corridor` to the space it runs into.
    fn connect(
        &mut self,
        corridor: SpaceId,
        hall: &Hall,
        target: SpaceId,
        carved: &mut Vec<SpaceId>,
    ) -> Result<(), CarveError> {
        let kind = self.spaces[target].kind;
        match kind {
            SpaceKind::Room(_) => {
                self.spaces.link(corridor, target);
            }
            SpaceKind::Hall(side) => {
                if side.dir == hall.dir {
                    return Err(CarveError::UnexpectedHall { space: target });
                }
                let split = self.create_junction(target, side, hall.offset)?;
                self.spaces.link(corridor, split.junction);
                carved.push(split.junction);
                carved.extend(split.new_hall);
            }
        }
        Ok(())
    }

    /// Cuts the hall `id` around cell `at` of its extent and puts a junction
    /// room there.
    ///
    /// The piece before `at` stays `id`; when there is none, `id` itself
    /// becomes the junction. Neighbours at the hall's far end move to the
    /// piece after `at`, or to the junction when that piece is empty.
    fn create_junction(
        &mut self,
        id: SpaceId,
        hall: Hall,
        at: i32,
    ) -> Result<JunctionSplit, CarveError> {
        debug_assert!(at >= hall.begin && at < hall.end, "junction outside {:?}", hall);

        let far_end: Vec<SpaceId> = self.spaces[id]
            .neighbors
            .iter()
            .copied()
            .filter(|&n| self.spaces[n].shape().begin_longitude(hall.dir) == hall.end)
            .collect();

        let mut cell = Rect::default();
        *cell.begin_longitude_mut(hall.dir) = at;
        *cell.end_longitude_mut(hall.dir) = at + 1;
        *cell.begin_latitude_mut(hall.dir) = hall.offset;
        *cell.end_latitude_mut(hall.dir) = hall.offset + hall.thickness;

        let junction = if at > hall.begin {
            if let Some(near) = self.spaces[id].as_hall_mut() {
                near.end = at;
            }
            let junction = self.spaces.push(Space::room(cell))?;
            self.spaces.link(id, junction);
            junction
        } else {
            self.spaces[id].kind = SpaceKind::Room(cell);
            self.stats.hall_count = self.stats.hall_count.saturating_sub(1);
            id
        };
        self.stats.junction_count += 1;

        let new_hall = if at + 1 < hall.end {
            let far = self.spaces.push(Space::hall(Hall {
                begin: at + 1,
                ..hall
            }))?;
            self.spaces.link(junction, far);
            self.stats.hall_count += 1;
            Some(far)
        } else {
            None
        };

        let far_owner = new_hall.unwrap_or(junction);
        if far_owner != id {
            for neighbor in far_end {
                self.relink(neighbor, id, far_owner)?;
            }
        }

        trace!(
            "Junction {} at {} of hall {}, far piece {:?}",
            junction,
            at,
            id,
            new_hall
        );
        Ok(JunctionSplit { junction, new_hall })
    }

    /// Moves the edge `neighbor`-`from` to `neighbor`-`to`.
    fn relink(&mut self, neighbor: SpaceId, from: SpaceId, to: SpaceId) -> Result<(), CarveError> {
        if !self.spaces[neighbor].unlink(from) {
            return Err(CarveError::MalformedLink {
                space: neighbor,
                expected: from,
            });
        }
        if !self.spaces[from].unlink(neighbor) {
            return Err(CarveError::MalformedLink {
                space: from,
                expected: neighbor,
            });
        }
        self.spaces.link(to, neighbor);
        Ok(())
    }
}
