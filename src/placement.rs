//! Draw origins for the fill and outline glyphs of a cell.
//!
//! Starting from the cell origin (bottom-left, with its rounding bias), the
//! fill origin is moved right by any left overhang and up by the font's
//! descent plus a margin, so the glyph's lowest point sits on the cell
//! bottom. The outline origin is the fill origin moved by fixed margins that
//! keep the widest stroke off the neighbouring cell.

use crate::config::PlacementConfig;
use crate::glyph::RawMetrics;
use crate::grid::{AtlasGeometry, Cell, Point};

/// Baseline origins for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origins {
    pub fill: Point,
    pub outline: Point,
}

/// Computes [`Origins`] from cell position and glyph metrics.
#[derive(Debug, Clone, Copy)]
pub struct PlacementCalculator {
    descent_margin: f32,
    outline_margin_x: f32,
    outline_margin_y: f32,
}

impl PlacementCalculator {
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            descent_margin: config.descent_margin,
            outline_margin_x: config.outline_margin_x,
            outline_margin_y: config.outline_margin_y,
        }
    }

    /// Origins for a glyph with `metrics` in a cell at `cell_origin`, for a
    /// face whose descent is `descent_px` pixels.
    pub fn origins(&self, cell_origin: Point, metrics: RawMetrics, descent_px: f32) -> Origins {
        let fill = cell_origin.offset(
            metrics.left_correction() as f32,
            -(descent_px + self.descent_margin),
        );
        let outline = fill.offset(self.outline_margin_x, -self.outline_margin_y);
        Origins { fill, outline }
    }
}

/// Whether `origin` lies inside `cell`: left edge inclusive, bottom edge inclusive.
pub fn within_cell(geometry: &AtlasGeometry, cell: Cell, origin: Point) -> bool {
    let (left, top, right, bottom) = geometry.cell_bounds(cell);
    origin.x >= left as f32
        && origin.x < right as f32
        && origin.y > top as f32
        && origin.y <= bottom as f32
}
