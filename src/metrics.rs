//! Horizontal metrics of glyph runs.

use crate::glyph::{FontFace, GlyphRun, RawMetrics};

/// Metrics of `run` in `face`.
///
/// Multi-codepoint runs are measured glyph by glyph and the three components
/// summed independently, before any clamping.
pub fn extract<F: FontFace + ?Sized>(face: &mut F, run: &GlyphRun) -> RawMetrics {
    run.chars().map(|ch| face.char_metrics(ch)).sum()
}
