//! Font backend: loads font files and serves metrics and glyph outlines.
//!
//! Outlines and per-glyph metrics come from `swash`; runs are laid out with
//! `rustybuzz` so the configured OpenType features apply. Raw font bytes are
//! owned by the face and borrowed transiently for each query.

mod discovery;

pub use discovery::{FontIndex, LocatedFont, locate};

use log::{info, warn};
use rustybuzz::ttf_parser;
use swash::scale::ScaleContext;
use swash::zeno::{Bounds, PathData};
use swash::{CacheKey, FontRef, StringId};

use crate::config::{FontConfig, FontSource};
use crate::error::{Error, Result};
use crate::glyph::{
    FontFace, FontSelection, GlyphAvailability, GlyphRun, RawMetrics, VerticalMetrics,
};
use crate::grid::Point;
use crate::raster::GlyphPath;

/// Parse feature strings into rustybuzz features.
///
/// Each string is a 4-char OpenType tag, optionally prefixed with `-` to
/// disable. Examples: `"calt"` (enable), `"-kern"` (disable).
pub fn parse_features(strings: &[String]) -> Vec<rustybuzz::Feature> {
    strings
        .iter()
        .filter_map(|s| {
            let (tag_str, value) = if let Some(rest) = s.strip_prefix('-') {
                (rest, 0)
            } else {
                (s.as_str(), 1)
            };
            let Ok(bytes) = <[u8; 4]>::try_from(tag_str.as_bytes()) else {
                warn!("font: ignoring invalid feature tag: {s}");
                return None;
            };
            let tag = ttf_parser::Tag::from_bytes(&bytes);
            Some(rustybuzz::Feature::new(tag, value, ..))
        })
        .collect()
}

/// Load the primary font and the optional fallback described by `config`.
pub fn load_selection(config: &FontConfig) -> Result<FontSelection<SwashFace>> {
    let features = parse_features(&config.features);
    let primary = load_face(&config.primary(), config.size, &features)?;
    let fallback = config
        .fallback
        .as_ref()
        .map(|source| load_face(source, config.size, &features))
        .transpose()?;
    Ok(FontSelection::new(primary, fallback))
}

fn load_face(
    source: &FontSource,
    size: f32,
    features: &[rustybuzz::Feature],
) -> Result<SwashFace> {
    let located = locate(source)?;
    let face = SwashFace::load(&located, size, features.to_vec())?;
    info!(
        "font: {} loaded from {} (face {}, {size}px)",
        face.name(),
        located.path.display(),
        located.index
    );
    Ok(face)
}

/// A font file at a fixed pixel size.
pub struct SwashFace {
    name: String,
    /// Raw font file bytes, borrowed by every query.
    data: Vec<u8>,
    index: u32,
    offset: u32,
    key: CacheKey,
    size: f32,
    features: Vec<rustybuzz::Feature>,
    vertical: VerticalMetrics,
    context: ScaleContext,
}

impl SwashFace {
    pub fn load(
        located: &LocatedFont,
        size: f32,
        features: Vec<rustybuzz::Feature>,
    ) -> Result<Self> {
        let data = std::fs::read(&located.path).map_err(|e| Error::io(&located.path, e))?;
        Self::from_bytes(data, located.index, size, features).ok_or_else(|| Error::FontParse {
            path: located.path.clone(),
            index: located.index,
        })
    }

    /// `None` when `data` holds no usable face at `index`.
    pub fn from_bytes(
        data: Vec<u8>,
        index: u32,
        size: f32,
        features: Vec<rustybuzz::Feature>,
    ) -> Option<Self> {
        let font = FontRef::from_index(&data, index as usize)?;
        rustybuzz::Face::from_slice(&data, index)?;
        let (offset, key) = (font.offset, font.key);
        let name = family_name(font).unwrap_or_else(|| format!("face {index}"));
        let vertical = vertical_metrics(&data, index, font);
        Some(Self {
            name,
            data,
            index,
            offset,
            key,
            size,
            features,
            vertical,
            context: ScaleContext::new(),
        })
    }

    fn font(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }
}

fn family_name(font: FontRef<'_>) -> Option<String> {
    let name = font.localized_strings().find_by_id(StringId::Family, None)?;
    Some(name.chars().collect())
}

/// OS/2 Windows descent when present, else the font's typographic descent.
fn vertical_metrics(data: &[u8], index: u32, font: FontRef<'_>) -> VerticalMetrics {
    let metrics = font.metrics(&[]);
    let win_descent = ttf_parser::Face::parse(data, index)
        .ok()
        .and_then(|face| face.tables().os2)
        .map(|os2| os2.windows_descender().unsigned_abs());
    VerticalMetrics {
        cell_descent: win_descent.unwrap_or_else(|| metrics.descent.abs().round() as u16),
        em_height: metrics.units_per_em,
    }
}

/// Whole-pixel metrics from an outline's bounds and the advance width.
fn ink_metrics(bounds: Option<Bounds>, advance: f32) -> RawMetrics {
    let advance = advance.round() as i32;
    match bounds {
        Some(b) if b.max.x > b.min.x => {
            let leading = b.min.x.floor() as i32;
            let body = b.max.x.ceil() as i32 - leading;
            RawMetrics::new(leading, body, advance - leading - body)
        }
        _ => RawMetrics::new(0, advance, 0),
    }
}

impl GlyphAvailability for SwashFace {
    fn has_glyph(&self, ch: char) -> bool {
        self.font().charmap().map(ch) != 0
    }
}

impl FontFace for SwashFace {
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
        let font = FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        };
        let glyph_id = font.charmap().map(ch);
        let advance = font
            .glyph_metrics(&[])
            .scale(self.size)
            .advance_width(glyph_id);
        let mut scaler = self
            .context
            .builder(font)
            .size(self.size)
            .hint(false)
            .build();
        let bounds = scaler.scale_outline(glyph_id).map(|o| o.bounds());
        ink_metrics(bounds, advance)
    }

    fn run_path(&mut self, run: &GlyphRun, origin: Point) -> GlyphPath {
        let mut path = GlyphPath::new();
        let Some(face) = rustybuzz::Face::from_slice(&self.data, self.index) else {
            return path;
        };

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(run.as_str());
        buffer.set_direction(rustybuzz::Direction::LeftToRight);
        let shaped = rustybuzz::shape(&face, &self.features, buffer);

        let scale = self.size / face.units_per_em().max(1) as f32;
        let font = FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        };
        let mut scaler = self
            .context
            .builder(font)
            .size(self.size)
            .hint(false)
            .build();

        let mut pen = origin.x;
        for (info, pos) in shaped.glyph_infos().iter().zip(shaped.glyph_positions()) {
            let glyph_origin = Point::new(
                pen + pos.x_offset as f32 * scale,
                origin.y - pos.y_offset as f32 * scale,
            );
            if let Some(outline) = scaler.scale_outline(info.glyph_id as u16) {
                path.extend_flipped(outline.path().commands(), glyph_origin);
            }
            pen += pos.x_advance as f32 * scale;
        }
        path
    }
}
