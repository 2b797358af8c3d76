//! Broad-phase collision detection using a uniform spatial grid

use std::collections::HashSet;

use crate::error::PhysicsError;
use crate::types::{BoundingBox, Particle, Vec2};

/// Uniform grid over the simulated area. Objects outside the bounds are
/// clamped into the border cells so nothing is ever missed.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    pub cell_size: f32,
    pub bounds: BoundingBox,
    pub dims: [usize; 2],
    pub cells: Vec<Vec<usize>>,
}

/// Statistics about the spatial grid
#[derive(Clone, Copy, Debug)]
pub struct SpatialGridStats {
    pub occupied_cells: usize,
    pub total_entries: usize,
    pub average_entries_per_cell: f32,
}

/// Upper bound on the number of grid cells.
pub const MAX_GRID_CELLS: usize = 1 << 20;

impl SpatialGrid {
    /// Lay a grid of `cell_size` cells over `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidParams`] for a non-positive or
    /// non-finite cell size or extent, or when the grid would need more than
    /// [`MAX_GRID_CELLS`] cells.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(cell_size: f32, bounds: BoundingBox) -> Result<Self, PhysicsError> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(PhysicsError::InvalidParams("grid cell size must be positive"));
        }
        let extent = bounds.max - bounds.min;
        if !(extent.is_finite() && extent.x >= 0.0 && extent.y >= 0.0) {
            return Err(PhysicsError::InvalidParams("grid bounds must be finite"));
        }
        let cols = (extent.x / cell_size).ceil().max(1.0);
        let rows = (extent.y / cell_size).ceil().max(1.0);
        if cols * rows > MAX_GRID_CELLS as f32 {
            return Err(PhysicsError::InvalidParams("extent needs too many grid cells"));
        }
        let dims = [cols as usize, rows as usize];
        Ok(Self {
            cell_size,
            bounds,
            dims,
            cells: vec![Vec::new(); dims[0] * dims[1]],
        })
    }

    /// Clear all cells in the grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn world_to_grid(&self, p: Vec2) -> [usize; 2] {
        let local = (p - self.bounds.min) / self.cell_size;
        let clamp = |v: f32, dim: usize| {
            if v.is_nan() || v < 0.0 {
                0
            } else {
                (v as usize).min(dim - 1)
            }
        };
        [clamp(local.x, self.dims[0]), clamp(local.y, self.dims[1])]
    }

    /// Insert an object into every cell its bounding box overlaps
    pub fn insert(&mut self, index: usize, bounds: BoundingBox) {
        let min_grid = self.world_to_grid(bounds.min);
        let max_grid = self.world_to_grid(bounds.max);
        for y in min_grid[1]..=max_grid[1] {
            for x in min_grid[0]..=max_grid[0] {
                self.cells[y * self.dims[0] + x].push(index);
            }
        }
    }

    /// Rebuild the grid from the live particles
    pub fn update(&mut self, particles: &[Particle]) {
        self.clear();
        for (index, particle) in particles.iter().enumerate().filter(|(_, p)| p.alive) {
            self.insert(index, particle_bounding_box(particle));
        }
    }

    /// Unique `(i, j)` pairs with `i < j` sharing at least one cell
    #[must_use]
    pub fn potential_pairs(&self) -> Vec<(usize, usize)> {
        let mut checked = HashSet::new();
        let mut pairs = Vec::new();
        for cell in &self.cells {
            for (n, &a) in cell.iter().enumerate() {
                for &b in &cell[n + 1..] {
                    let pair = if a < b { (a, b) } else { (b, a) };
                    if checked.insert(pair) {
                        pairs.push(pair);
                    }
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> SpatialGridStats {
        let occupied_cells = self.cells.iter().filter(|cell| !cell.is_empty()).count();
        let total_entries: usize = self.cells.iter().map(Vec::len).sum();
        let average_entries_per_cell = if occupied_cells > 0 {
            total_entries as f32 / occupied_cells as f32
        } else {
            0.0
        };
        SpatialGridStats {
            occupied_cells,
            total_entries,
            average_entries_per_cell,
        }
    }
}

/// Calculate bounding box for a particle
fn particle_bounding_box(particle: &Particle) -> BoundingBox {
    let r = Vec2::new(particle.radius, particle.radius);
    BoundingBox {
        min: particle.pos - r,
        max: particle.pos + r,
    }
}
