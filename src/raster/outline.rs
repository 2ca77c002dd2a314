//! Soft outline rings: the same glyph path stroked at increasing widths.
//!
//! Thin strokes are drawn opaque and wide ones faint, so the accumulated
//! ring fades toward its outer edge without a blur pass.

use std::ops::Range;

use swash::zeno::{Join, Mask, Stroke};

use super::{GlyphPath, Surface};
use crate::grid::AtlasGeometry;

/// Opacity of the stroke of width `width`: `255 / ceil(width / 1.5)`, truncated.
pub fn stroke_opacity(width: u32) -> u8 {
    let steps = (f64::from(width) / 1.5).ceil();
    (255.0 / steps) as u8
}

/// Owns the outline atlas and draws stroke rings into it.
pub struct OutlineRasterizer {
    surface: Surface,
    widths: Range<u32>,
}

impl OutlineRasterizer {
    /// Strokes are drawn at every width in `widths` (end exclusive).
    pub fn new(geometry: &AtlasGeometry, widths: Range<u32>) -> Self {
        Self {
            surface: Surface::new(geometry),
            widths,
        }
    }

    /// Stroke `path` once per configured width with round joins, thinnest first.
    pub fn draw(&mut self, path: &GlyphPath) {
        if path.is_empty() {
            return;
        }
        for width in self.widths.clone() {
            let mut stroke = Stroke::new(width as f32);
            stroke.join(Join::Round);
            let (mask, placement) = Mask::new(path.commands()).style(stroke).render();
            self.surface.composite(&mask, placement, stroke_opacity(width));
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn into_surface(self) -> Surface {
        self.surface
    }
}
