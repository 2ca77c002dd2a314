//! Synthetic font face for exercising the pipeline without system fonts.

use std::collections::HashMap;

use crate::glyph::{FontFace, GlyphAvailability, GlyphRun, RawMetrics, VerticalMetrics};
use crate::grid::Point;
use crate::raster::GlyphPath;

/// Ink height of every fake glyph above the baseline.
pub(crate) const INK_HEIGHT: f32 = 20.0;

/// Draws each glyph as a solid rectangle sized by its ABC metrics.
pub(crate) struct FakeFace {
    name: String,
    size: f32,
    glyphs: HashMap<char, RawMetrics>,
    notdef: RawMetrics,
    vertical: VerticalMetrics,
    metric_queries: usize,
}

impl FakeFace {
    /// 40px face with a 10px descent (500 / 2000 units).
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            size: 40.0,
            glyphs: HashMap::new(),
            notdef: RawMetrics::new(1, 10, 1),
            vertical: VerticalMetrics {
                cell_descent: 500,
                em_height: 2000,
            },
            metric_queries: 0,
        }
    }

    pub(crate) fn with_glyph(mut self, ch: char, metrics: RawMetrics) -> Self {
        self.glyphs.insert(ch, metrics);
        self
    }

    pub(crate) fn with_descent(mut self, cell_descent: u16) -> Self {
        self.vertical.cell_descent = cell_descent;
        self
    }

    pub(crate) fn metric_queries(&self) -> usize {
        self.metric_queries
    }

    fn metrics_for(&self, ch: char) -> RawMetrics {
        self.glyphs.get(&ch).copied().unwrap_or(self.notdef)
    }
}

impl GlyphAvailability for FakeFace {
    fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }
}

impl FontFace for FakeFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> f32 {
        self.size
    }

    fn vertical_metrics(&self) -> VerticalMetrics {
        self.vertical
    }

    fn char_metrics(&mut self, ch: char) -> RawMetrics {
        self.metric_queries += 1;
        self.metrics_for(ch)
    }

    fn run_path(&mut self, run: &GlyphRun, origin: Point) -> GlyphPath {
        let mut path = GlyphPath::new();
        let mut pen = origin.x;
        for ch in run.chars() {
            let m = self.metrics_for(ch);
            if m.body > 0 {
                let left = pen + m.leading as f32;
                path.rect(left, origin.y - INK_HEIGHT, left + m.body as f32, origin.y);
            }
            pen += (m.leading + m.body + m.trailing) as f32;
        }
        path
    }
}
