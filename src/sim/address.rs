//! Grid addressing
//!
//! Addresses are row-major linear indices: `address = row * width + column`.
//! Row 0 is the top row; gravity pulls toward increasing row index.
//! Everything here is pure and stateless.

use glam::{Vec2, Vec3};

use crate::config::GridConfig;

/// Linear index of a grid cell in `[0, width * height)`
pub type GridAddress = usize;

/// Immutable grid size, both sides non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    width: usize,
    height: usize,
}

impl GridDimensions {
    /// Returns `None` if either side is zero or the cell count overflows `usize`
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        width.checked_mul(height)?;
        Some(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (size of the address space)
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn contains(&self, address: GridAddress) -> bool {
        address < self.cell_count()
    }

    /// (column, row) -> address, `None` if either coordinate is off the grid
    #[inline]
    pub fn to_address(&self, column: usize, row: usize) -> Option<GridAddress> {
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + column)
    }

    /// address -> (column, row). Does not range-check the row.
    #[inline]
    pub fn to_coords(&self, address: GridAddress) -> (usize, usize) {
        (address % self.width, address / self.width)
    }

    /// Move `base` by (dx, dy) cells. Out-of-bounds results are reported, not clamped.
    pub fn offset_address(&self, base: GridAddress, dx: i32, dy: i32) -> Option<GridAddress> {
        let (column, row) = self.to_coords(base);
        let column = column as i64 + dx as i64;
        let row = row as i64 + dy as i64;

        if column < 0 || column >= self.width as i64 {
            return None;
        }
        if row < 0 || row >= self.height as i64 {
            return None;
        }

        self.to_address(column as usize, row as usize)
    }

    /// 8-way adjacency (diagonals included). A cell is not its own neighbor.
    pub fn are_neighbors(&self, a: GridAddress, b: GridAddress) -> bool {
        if a == b {
            log::warn!("Neighbor check on the same address {}", a);
            return false;
        }
        if !self.contains(a) || !self.contains(b) {
            log::warn!("Neighbor check on invalid addresses {} / {}", a, b);
            return false;
        }

        let (col_a, row_a) = self.to_coords(a);
        let (col_b, row_b) = self.to_coords(b);

        row_a.abs_diff(row_b) <= 1 && col_a.abs_diff(col_b) <= 1
    }

    /// All in-bounds neighbors of `address`, row by row from the top-left
    pub fn neighbors_of(&self, address: GridAddress) -> Vec<GridAddress> {
        if !self.contains(address) {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(n) = self.offset_address(address, dx, dy) {
                    out.push(n);
                }
            }
        }
        out
    }
}

/// Dimensions plus the world-space layout of tile centers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub dims: GridDimensions,
    /// Tile footprint: x = column pitch, y = row pitch (applied on world z)
    pub tile_size: Vec2,
    /// World position of the grid center
    pub center: Vec3,
}

impl GridGeometry {
    pub fn new(dims: GridDimensions, tile_size: Vec2, center: Vec3) -> Option<Self> {
        if tile_size.x <= 0.0 || tile_size.y <= 0.0 {
            return None;
        }
        Some(Self {
            dims,
            tile_size,
            center,
        })
    }

    /// Build from config. `None` if the dimensions or tile size are degenerate.
    pub fn from_config(config: &GridConfig) -> Option<Self> {
        let dims = GridDimensions::new(config.width, config.height)?;
        Self::new(
            dims,
            Vec2::new(config.tile_width, config.tile_height),
            Vec3::from_array(config.center),
        )
    }

    /// World-space center of the tile at `address` on the x/z plane.
    /// Tiles are laid out symmetrically around `center`. `None` off the grid.
    pub fn world_position(&self, address: GridAddress) -> Option<Vec3> {
        if !self.dims.contains(address) {
            return None;
        }
        let (column, row) = self.dims.to_coords(address);
        let w = self.dims.width() as f32;
        let h = self.dims.height() as f32;

        // Column 0 / row 0 origin, half a tile in from the grid edge
        let origin = Vec2::new(
            -(w / 2.0) * self.tile_size.x + self.tile_size.x * 0.5,
            -(h / 2.0) * self.tile_size.y + self.tile_size.y * 0.5,
        );
        let offset = origin + self.tile_size * Vec2::new(column as f32, row as f32);

        Some(self.center + Vec3::new(offset.x, 0.0, offset.y))
    }
}
