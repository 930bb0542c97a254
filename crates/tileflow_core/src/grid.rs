//! Grid bounds and world-space mapping

use crate::CellPos;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for grid construction failures
#[derive(Debug, Error)]
pub enum GridError {
    /// Grid dimensions must be strictly positive; anything else is a broken
    /// invariant upstream, not a recoverable user action.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// The rectangular bounds of a grid, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub width: u32,
    pub height: u32,
}

impl GridRect {
    /// Create grid bounds. Fails on zero width or height.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Iterate every in-bounds position in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellPos> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| CellPos::new(x, y)))
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Placement of the grid in world space: translation of the grid origin,
/// yaw rotation around it, and a uniform cell size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTransform {
    pub origin_x: f32,
    pub origin_y: f32,
    pub yaw_degrees: f32,
    pub cell_size: f32,
}

impl Default for GridTransform {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            yaw_degrees: 0.0,
            cell_size: 1.0,
        }
    }
}

impl GridTransform {
    /// Map a world position to the grid cell containing it.
    ///
    /// The inverse of [`grid_to_world`](Self::grid_to_world) up to the cell
    /// the point falls in: the world point is translated into grid-local
    /// space, rotated by `-yaw`, scaled by `1 / cell_size`, and floored.
    pub fn world_to_grid(&self, world_x: f32, world_y: f32) -> CellPos {
        let local_x = world_x - self.origin_x;
        let local_y = world_y - self.origin_y;
        let rad = -self.yaw_degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        let unrotated_x = local_x * cos - local_y * sin;
        let unrotated_y = local_x * sin + local_y * cos;
        CellPos::new(
            (unrotated_x / self.cell_size).floor() as i32,
            (unrotated_y / self.cell_size).floor() as i32,
        )
    }

    /// Map a grid cell to the world position of its center.
    pub fn grid_to_world(&self, pos: CellPos) -> (f32, f32) {
        let local_x = (pos.x as f32 + 0.5) * self.cell_size;
        let local_y = (pos.y as f32 + 0.5) * self.cell_size;
        let rad = self.yaw_degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        (
            local_x * cos - local_y * sin + self.origin_x,
            local_x * sin + local_y * cos + self.origin_y,
        )
    }
}
