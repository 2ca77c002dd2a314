//! Cell grid arithmetic: index ↔ (row, col) and cell pixel origins.
//!
//! Cells are laid out row-major, `cells_per_row = texture_width / cell_width`
//! to a row. A [`Cell`] only stores its index; row and column are always
//! derived so they cannot drift apart.

use std::fmt;

use crate::error::ConfigError;

/// A position in atlas pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Shift by `dx` right and `dy` down.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One slot of the atlas grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    index: usize,
    cells_per_row: usize,
}

impl Cell {
    /// Linear index in row-major order.
    pub fn index(self) -> usize {
        self.index
    }

    pub fn row(self) -> usize {
        self.index / self.cells_per_row
    }

    pub fn col(self) -> usize {
        self.index % self.cells_per_row
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({}, {})", self.index, self.row(), self.col())
    }
}

/// Fixed geometry shared by the fill and outline atlases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasGeometry {
    texture_width: u32,
    cell_width: u32,
    cell_height: u32,
    total_cells: usize,
}

impl AtlasGeometry {
    pub fn new(
        texture_width: u32,
        cell_width: u32,
        cell_height: u32,
        total_cells: usize,
    ) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("atlas.texture_width", texture_width as usize),
            ("atlas.cell_width", cell_width as usize),
            ("atlas.cell_height", cell_height as usize),
            ("atlas.total_cells", total_cells),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        if cell_width > texture_width {
            return Err(ConfigError::CellWiderThanTexture {
                cell_width,
                texture_width,
            });
        }
        let geometry = Self {
            texture_width,
            cell_width,
            cell_height,
            total_cells,
        };
        // Every row offset below is computed in u32 from here on.
        let rows = geometry.rows();
        u32::try_from(rows)
            .ok()
            .and_then(|r| r.checked_mul(cell_height))
            .ok_or(ConfigError::TextureTooTall { rows, cell_height })?;
        Ok(geometry)
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    pub fn total_cells(&self) -> usize {
        self.total_cells
    }

    pub fn cells_per_row(&self) -> usize {
        (self.texture_width / self.cell_width) as usize
    }

    /// Number of grid rows needed to hold every cell.
    pub fn rows(&self) -> usize {
        self.total_cells.div_ceil(self.cells_per_row())
    }

    pub fn texture_width(&self) -> u32 {
        self.texture_width
    }

    pub fn texture_height(&self) -> u32 {
        self.rows() as u32 * self.cell_height
    }

    /// The cell at `index`, or `None` past the end of the grid.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        (index < self.total_cells).then_some(Cell {
            index,
            cells_per_row: self.cells_per_row(),
        })
    }

    /// The cell at `(row, col)`, or `None` when either lies outside the grid.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<Cell> {
        let per_row = self.cells_per_row();
        if col >= per_row {
            return None;
        }
        row.checked_mul(per_row)
            .and_then(|base| base.checked_add(col))
            .and_then(|index| self.cell(index))
    }

    /// Every cell in increasing index order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let cells_per_row = self.cells_per_row();
        (0..self.total_cells).map(move |index| Cell {
            index,
            cells_per_row,
        })
    }

    /// Uncorrected draw origin of a cell: one pixel in from the left edge, on
    /// the bottom edge. The engine samples glyphs with this bias baked in.
    pub fn cell_origin(&self, cell: Cell) -> Point {
        Point::new(
            1.0 + (cell.col() as u32 * self.cell_width) as f32,
            ((cell.row() as u32 + 1) * self.cell_height) as f32,
        )
    }

    /// Pixel bounds of a cell as `(left, top, right, bottom)`, right/bottom exclusive.
    pub fn cell_bounds(&self, cell: Cell) -> (u32, u32, u32, u32) {
        let left = cell.col() as u32 * self.cell_width;
        let top = cell.row() as u32 * self.cell_height;
        (left, top, left + self.cell_width, top + self.cell_height)
    }
}
