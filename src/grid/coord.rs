//! Integer cell coordinates and the world-to-cell mapping.

use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::DEFAULT_CELL_SIZE;
use crate::numeric::{ceil_to_u32, floor_to_i32, i32_to_f32};

/// Column/row address of a grid cell.
///
/// Columns follow world X and rows follow world Z.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CellCoord {
    /// Index along world X.
    pub column: i32,
    /// Index along world Z.
    pub row: i32,
}

impl CellCoord {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Number of cells between `self` and `other` along the longer axis.
    ///
    /// # Examples
    /// ```
    /// use warden::CellCoord;
    /// assert_eq!(CellCoord::new(0, 0).chebyshev(CellCoord::new(-2, 5)), 5);
    /// ```
    #[must_use]
    pub const fn chebyshev(self, other: Self) -> u32 {
        let columns = self.column.abs_diff(other.column);
        let rows = self.row.abs_diff(other.row);
        if columns > rows {
            columns
        } else {
            rows
        }
    }

    /// `self` shifted by `offset`, or `None` when either axis leaves the
    /// `i32` range.
    ///
    /// # Examples
    /// ```
    /// use warden::CellCoord;
    /// let edge = CellCoord::new(i32::MAX, 0);
    /// assert_eq!(edge.checked_offset(CellCoord::new(-1, 1)), Some(CellCoord::new(i32::MAX - 1, 1)));
    /// assert_eq!(edge.checked_offset(CellCoord::new(1, 0)), None);
    /// ```
    #[must_use]
    pub const fn checked_offset(self, offset: Self) -> Option<Self> {
        let Some(column) = self.column.checked_add(offset.column) else {
            return None;
        };
        let Some(row) = self.row.checked_add(offset.row) else {
            return None;
        };
        Some(Self { column, row })
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((column, row): (i32, i32)) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cell size and origin offset used to map world space onto the lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    cell_size: f32,
    offset: Vec2,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            offset: Vec2::ZERO,
        }
    }
}

impl GridGeometry {
    /// Creates a geometry.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when `cell_size` is not finite and
    /// positive or `offset` is not finite.
    pub fn new(cell_size: f32, offset: Vec2) -> Result<Self, ConfigError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::invalid(
                "grid.cell_size",
                format!("must be finite and positive, got {cell_size}"),
            ));
        }
        if !offset.is_finite() {
            return Err(ConfigError::invalid("grid.offset", "must be finite"));
        }
        Ok(Self { cell_size, offset })
    }

    /// Cell edge length in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World X/Z position of the corner of cell `(0, 0)`.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Cell containing `world`. Height is ignored.
    ///
    /// # Examples
    /// ```
    /// use glam::{Vec2, Vec3};
    /// use warden::{CellCoord, GridGeometry};
    /// let geometry = GridGeometry::new(2.0, Vec2::new(-10.0, 0.0))?;
    /// assert_eq!(geometry.to_cell(Vec3::new(-9.0, 4.0, 3.5)), CellCoord::new(0, 1));
    /// assert_eq!(geometry.to_cell(Vec3::new(-10.5, 0.0, -0.1)), CellCoord::new(-1, -1));
    /// # Ok::<(), warden::ConfigError>(())
    /// ```
    #[must_use]
    pub fn to_cell(&self, world: Vec3) -> CellCoord {
        CellCoord::new(
            floor_to_i32((world.x - self.offset.x) / self.cell_size),
            floor_to_i32((world.z - self.offset.y) / self.cell_size),
        )
    }

    /// World-space centre of `cell` at height zero.
    #[must_use]
    pub fn to_world(&self, cell: CellCoord) -> Vec3 {
        let half = self.cell_size * 0.5;
        Vec3::new(
            i32_to_f32(cell.column).mul_add(self.cell_size, half) + self.offset.x,
            0.0,
            i32_to_f32(cell.row).mul_add(self.cell_size, half) + self.offset.y,
        )
    }

    /// Cell radius covering `world_radius`, rounded up.
    ///
    /// Negative and `NaN` radii cover only the centre cell.
    #[must_use]
    pub fn cells_for_radius(&self, world_radius: f32) -> u32 {
        ceil_to_u32(world_radius / self.cell_size)
    }
}
