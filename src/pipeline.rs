//! Per-cell render loop.
//!
//! Cells are processed strictly in index order. Each populated cell is
//! resolved to a glyph run and a face, measured, placed, drawn into both
//! atlases and assigned its width byte. The first fatal error aborts the run.

use log::{debug, info, warn};

use crate::config::{Config, MissingGlyphPolicy};
use crate::error::{Error, Result};
use crate::glyph::{FaceChoice, FontFace, FontSelection};
use crate::input::InputSequence;
use crate::metrics;
use crate::placement::{PlacementCalculator, within_cell};
use crate::raster::{GlyphRasterizer, OutlineRasterizer, Surface};
use crate::resolver::{CellSource, GlyphResolver, OverrideTable};
use crate::width::{WidthQuantizer, WidthTable};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Cells that received a glyph.
    pub populated: usize,
    pub empty: usize,
    pub overridden: usize,
    /// Cells drawn with the fallback font.
    pub fallback: usize,
    /// Cells drawn with the missing-glyph shape.
    pub missing: usize,
    /// Cells left empty because no font covers them.
    pub skipped: usize,
    /// Width bytes that did not fit and were saturated or wrapped.
    pub overflowed: usize,
}

/// Everything one run produces.
pub struct RenderedAtlas {
    pub fill: Surface,
    pub outline: Surface,
    pub widths: WidthTable,
    pub stats: RenderStats,
}

/// Render every cell of the grid described by `config`.
pub fn render<F: FontFace>(
    config: &Config,
    input: &InputSequence,
    fonts: &mut FontSelection<F>,
) -> Result<RenderedAtlas> {
    let geometry = config.geometry()?;
    let resolver = GlyphResolver::new(OverrideTable::from_entries(&config.overrides, &geometry)?);
    let placement = PlacementCalculator::new(&config.placement);
    let quantizer = WidthQuantizer::from_config(&config.width);

    let mut fill = GlyphRasterizer::new(&geometry);
    let mut outline = OutlineRasterizer::new(&geometry, config.outline.min..config.outline.max);
    let mut widths = WidthTable::new(geometry.total_cells());
    let mut stats = RenderStats::default();

    info!(
        "render: {} cells, {} per row, {}x{} texture",
        geometry.total_cells(),
        geometry.cells_per_row(),
        geometry.texture_width(),
        geometry.texture_height()
    );

    for cell in geometry.cells() {
        let Some(resolved) = resolver.resolve(cell, input.get(cell.index()), fonts) else {
            stats.empty += 1;
            continue;
        };

        if resolved.missing {
            let ch = resolved
                .run
                .chars()
                .find(|&c| !fonts.primary().has_glyph(c))
                .unwrap_or('\u{FFFD}');
            match config.glyphs.missing {
                MissingGlyphPolicy::Render => {
                    warn!(
                        "cell {cell}: no font has {ch:?} (U+{:04X}), drawing the missing-glyph shape",
                        u32::from(ch)
                    );
                    stats.missing += 1;
                }
                MissingGlyphPolicy::Skip => {
                    warn!(
                        "cell {cell}: no font has {ch:?} (U+{:04X}), leaving it empty",
                        u32::from(ch)
                    );
                    stats.skipped += 1;
                    continue;
                }
                MissingGlyphPolicy::Reject => {
                    return Err(Error::MissingGlyph {
                        index: cell.index(),
                        ch,
                    });
                }
            }
        }
        if resolved.source == CellSource::Override {
            stats.overridden += 1;
        }
        if resolved.face == FaceChoice::Fallback {
            stats.fallback += 1;
        }

        let face = fonts.face_mut(resolved.face);
        if resolved.face == FaceChoice::Fallback {
            debug!(
                "cell {cell}: {:?} from fallback {}",
                resolved.run.as_str(),
                face.name()
            );
        }
        let raw = metrics::extract(face, &resolved.run);
        let descent = face.vertical_metrics().descent_px(face.size());
        let origins = placement.origins(geometry.cell_origin(cell), raw, descent);
        if !within_cell(&geometry, cell, origins.fill) {
            warn!(
                "cell {cell}: origin ({}, {}) falls outside the cell",
                origins.fill.x, origins.fill.y
            );
        }

        fill.draw(&face.run_path(&resolved.run, origins.fill));
        outline.draw(&face.run_path(&resolved.run, origins.outline));

        let quantized = quantizer.quantize(raw).map_err(|e| Error::WidthOverflow {
            index: cell.index(),
            value: e.value,
        })?;
        if let Some(value) = quantized.overflowed {
            warn!(
                "cell {cell}: width {value} does not fit a byte, stored {}",
                quantized.byte
            );
            stats.overflowed += 1;
        }
        widths.set(cell, quantized.byte);
        stats.populated += 1;
    }

    info!(
        "render: {} populated, {} empty, {} overridden, {} fallback, {} missing",
        stats.populated, stats.empty, stats.overridden, stats.fallback, stats.missing
    );

    Ok(RenderedAtlas {
        fill: fill.into_surface(),
        outline: outline.into_surface(),
        widths,
        stats,
    })
}

#[cfg(test)]
mod tests;
