//! Solid glyph fills into the primary atlas.

use swash::zeno::{Fill, Mask};

use super::{GlyphPath, Surface};
use crate::grid::AtlasGeometry;

/// Owns the fill atlas and draws opaque glyph bodies into it.
pub struct GlyphRasterizer {
    surface: Surface,
}

impl GlyphRasterizer {
    pub fn new(geometry: &AtlasGeometry) -> Self {
        Self {
            surface: Surface::new(geometry),
        }
    }

    /// Fill `path` (non-zero winding) in opaque white.
    pub fn draw(&mut self, path: &GlyphPath) {
        if path.is_empty() {
            return;
        }
        let (mask, placement) = Mask::new(path.commands()).style(Fill::NonZero).render();
        self.surface.composite(&mask, placement, 255);
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn into_surface(self) -> Surface {
        self.surface
    }
}
