//! Uniform bucket grid for spatial queries.
//!
//! The grid is cleared and rebuilt from entity positions every tick. It
//! stores raw per-cell index lists per entity category; callers assemble
//! their own scans (a 3x3 neighborhood for local interactions, a
//! vision-radius range for sensing) and choose their own deduplication and
//! early-exit strategy.

use serde::{Deserialize, Serialize};

/// Entity category stored in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridCategory {
    /// Fruit entities.
    Fruit,
    /// Poison entities.
    Poison,
    /// Agents.
    Agent,
    /// Obstacles (inserted with extent).
    Obstacle,
}

/// Spatial bucket grid over the arena.
///
/// Out-of-bounds positions are clamped to the nearest valid cell rather
/// than rejected, so entities mid-wrap still land in a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialGrid {
    width: usize,
    height: usize,
    cell_size: f32,
    fruit: Vec<Vec<usize>>,
    poison: Vec<Vec<usize>>,
    agents: Vec<Vec<usize>>,
    obstacles: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// Creates a grid covering an arena of the given dimensions.
    pub fn new(arena_width: f32, arena_height: f32, cell_size: f32) -> Self {
        let width = (arena_width / cell_size) as usize + 1;
        let height = (arena_height / cell_size) as usize + 1;
        let cells = width * height;
        Self {
            width,
            height,
            cell_size,
            fruit: vec![Vec::new(); cells],
            poison: vec![Vec::new(); cells],
            agents: vec![Vec::new(); cells],
            obstacles: vec![Vec::new(); cells],
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell size in world units.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Empties all buckets, keeping their allocations for the next tick.
    pub fn clear(&mut self) {
        for bucket in self
            .fruit
            .iter_mut()
            .chain(self.poison.iter_mut())
            .chain(self.agents.iter_mut())
            .chain(self.obstacles.iter_mut())
        {
            bucket.clear();
        }
    }

    /// Cell coordinates containing a position, clamped into bounds.
    pub fn cell_at(&self, x: f32, y: f32) -> (usize, usize) {
        let gx = ((x / self.cell_size) as isize).clamp(0, self.width as isize - 1) as usize;
        let gy = ((y / self.cell_size) as isize).clamp(0, self.height as isize - 1) as usize;
        (gx, gy)
    }

    #[inline]
    fn slot(&self, gx: usize, gy: usize) -> usize {
        gy * self.width + gx
    }

    /// Inserts a point entity into the cell containing `(x, y)`.
    pub fn insert(&mut self, category: GridCategory, index: usize, x: f32, y: f32) {
        let (gx, gy) = self.cell_at(x, y);
        let slot = self.slot(gx, gy);
        match category {
            GridCategory::Fruit => self.fruit[slot].push(index),
            GridCategory::Poison => self.poison[slot].push(index),
            GridCategory::Agent => self.agents[slot].push(index),
            GridCategory::Obstacle => self.obstacles[slot].push(index),
        }
    }

    /// Inserts an extended entity into every cell its bounding box overlaps.
    pub fn insert_extent(&mut self, category: GridCategory, index: usize, x: f32, y: f32, w: f32, h: f32) {
        let (gx0, gy0) = self.cell_at(x, y);
        let (gx1, gy1) = self.cell_at(x + w, y + h);
        for gy in gy0..=gy1 {
            for gx in gx0..=gx1 {
                let slot = self.slot(gx, gy);
                match category {
                    GridCategory::Fruit => self.fruit[slot].push(index),
                    GridCategory::Poison => self.poison[slot].push(index),
                    GridCategory::Agent => self.agents[slot].push(index),
                    GridCategory::Obstacle => self.obstacles[slot].push(index),
                }
            }
        }
    }

    /// Raw fruit index list for one cell.
    pub fn fruit_at(&self, gx: usize, gy: usize) -> &[usize] {
        &self.fruit[self.slot(gx, gy)]
    }

    /// Raw poison index list for one cell.
    pub fn poison_at(&self, gx: usize, gy: usize) -> &[usize] {
        &self.poison[self.slot(gx, gy)]
    }

    /// Raw agent index list for one cell.
    pub fn agents_at(&self, gx: usize, gy: usize) -> &[usize] {
        &self.agents[self.slot(gx, gy)]
    }

    /// Raw obstacle index list for one cell.
    pub fn obstacles_at(&self, gx: usize, gy: usize) -> &[usize] {
        &self.obstacles[self.slot(gx, gy)]
    }

    /// Cell coordinates whose centers could hold entities within `radius`
    /// of `(x, y)`: the square of cells covering the query circle, clamped
    /// to the grid.
    pub fn cells_in_range(&self, x: f32, y: f32, radius: f32) -> impl Iterator<Item = (usize, usize)> + use<> {
        let (gx, gy) = self.cell_at(x, y);
        let range = (radius / self.cell_size) as usize + 1;
        let x0 = gx.saturating_sub(range);
        let y0 = gy.saturating_sub(range);
        let x1 = (gx + range).min(self.width - 1);
        let y1 = (gy + range).min(self.height - 1);
        (y0..=y1).flat_map(move |cy| (x0..=x1).map(move |cx| (cx, cy)))
    }
}
