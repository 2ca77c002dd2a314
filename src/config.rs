//! Configuration structures and loading logic.
//!
//! Every tunable of the atlas layout lives here. Defaults reproduce the
//! layout the engine ships with, so an empty config file is a valid run.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{ConfigError, Error, Result};
use crate::grid::AtlasGeometry;
use crate::resolver::OverrideTable;

/// Top-level configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub atlas: AtlasConfig,
    pub font: FontConfig,
    pub outline: OutlineConfig,
    pub width: WidthConfig,
    pub placement: PlacementConfig,
    pub glyphs: GlyphConfig,
    /// Cells whose content is replaced by a literal glyph run.
    pub overrides: Vec<OverrideEntry>,
    /// Literal rows of glyphs, used instead of an input blob.
    pub ranges: Vec<GlyphRange>,
}

/// Atlas grid geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub texture_width: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub total_cells: usize,
}

/// Font selection and shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Family name looked up among the installed fonts.
    pub family: String,
    /// Explicit font file; takes precedence over `family`.
    pub path: Option<PathBuf>,
    /// Face index inside a font collection file.
    pub index: u32,
    /// Font size in pixels.
    pub size: f32,
    /// OpenType features for run layout.
    ///
    /// Each string is a 4-character feature tag, optionally prefixed with `-`
    /// to disable. Kerning and ligatures are off by default so every
    /// codepoint is placed by its own advance.
    pub features: Vec<String>,
    /// Font consulted for codepoints the primary font lacks.
    pub fallback: Option<FontSource>,
}

/// Where to load one font from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSource {
    pub family: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub index: u32,
}

/// Outline stroke widths, `min..max` (max exclusive).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    pub min: u32,
    pub max: u32,
}

/// Width table quantization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthConfig {
    /// The engine stores advance widths divided by this factor.
    pub multiplier: f64,
    pub overflow: OverflowPolicy,
}

/// What to do with a quantized width outside `0..=255`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Clamp into range and warn.
    #[default]
    Saturate,
    /// Keep the low eight bits, as older builds of the tool did.
    Wrap,
    /// Abort the run.
    Reject,
}

/// Pixel margins applied on top of the computed draw origins.
///
/// These are tuned against the engine, not derived from font data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Extra upward shift of the fill baseline beyond the font's descent.
    pub descent_margin: f32,
    /// Rightward shift of the outline origin so wide strokes stay clear of the
    /// left neighbour.
    pub outline_margin_x: f32,
    /// Upward shift of the outline origin relative to the fill origin.
    pub outline_margin_y: f32,
}

/// Handling of codepoints no configured font covers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    pub missing: MissingGlyphPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingGlyphPolicy {
    /// Draw the primary font's missing-glyph shape and warn.
    #[default]
    Render,
    /// Leave the cell empty.
    Skip,
    /// Abort the run.
    Reject,
}

/// One cell override, keyed by grid position or by linear index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideEntry {
    Cell { row: usize, col: usize, text: String },
    Index { index: usize, text: String },
}

impl OverrideEntry {
    pub fn text(&self) -> &str {
        match self {
            Self::Cell { text, .. } | Self::Index { text, .. } => text,
        }
    }

    /// Human-readable key for diagnostics.
    pub fn key(&self) -> String {
        match self {
            Self::Cell { row, col, .. } => format!("({row}, {col})"),
            Self::Index { index, .. } => format!("#{index}"),
        }
    }
}

/// A row of literal glyphs placed from `col_offset` onward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphRange {
    pub row: usize,
    #[serde(default)]
    pub col_offset: usize,
    pub text: String,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            texture_width: 3072,
            cell_width: 48,
            cell_height: 48,
            total_cells: 8000,
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Droid Sans Fallback".to_owned(),
            path: None,
            index: 0,
            size: 38.0,
            features: ["-kern", "-liga", "-clig", "-calt"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            fallback: None,
        }
    }
}

impl FontConfig {
    /// The primary font as a loadable source.
    pub fn primary(&self) -> FontSource {
        FontSource {
            family: self.family.clone(),
            path: self.path.clone(),
            index: self.index,
        }
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self { min: 1, max: 8 }
    }
}

impl Default for WidthConfig {
    fn default() -> Self {
        Self {
            multiplier: 1.5,
            overflow: OverflowPolicy::default(),
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            descent_margin: 5.0,
            outline_margin_x: 4.0,
            outline_margin_y: 0.0,
        }
    }
}

/// Superscript annotations the engine expects in row 4.
fn default_overrides() -> Vec<OverrideEntry> {
    [(12, "¹⁸"), (14, "⁻¹"), (15, "⁻²⁴")]
        .into_iter()
        .map(|(col, text)| OverrideEntry::Cell {
            row: 4,
            col,
            text: text.to_owned(),
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            atlas: AtlasConfig::default(),
            font: FontConfig::default(),
            outline: OutlineConfig::default(),
            width: WidthConfig::default(),
            placement: PlacementConfig::default(),
            glyphs: GlyphConfig::default(),
            overrides: default_overrides(),
            ranges: Vec::new(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = toml::from_str(&data).map_err(|source| Error::TomlParse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        info!("config: loaded from {}", path.display());
        Ok(config)
    }

    /// Atlas geometry described by `[atlas]`.
    pub fn geometry(&self) -> Result<AtlasGeometry, ConfigError> {
        AtlasGeometry::new(
            self.atlas.texture_width,
            self.atlas.cell_width,
            self.atlas.cell_height,
            self.atlas.total_cells,
        )
    }

    /// Check every value that the render loop relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let geometry = self.geometry()?;

        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            return Err(ConfigError::BadFontSize);
        }
        if self.outline.min == 0 {
            return Err(ConfigError::Zero {
                field: "outline.min",
            });
        }
        if self.outline.min >= self.outline.max {
            return Err(ConfigError::EmptyOutlineRange {
                min: self.outline.min,
                max: self.outline.max,
            });
        }
        if !(self.width.multiplier.is_finite() && self.width.multiplier > 0.0) {
            return Err(ConfigError::BadMultiplier);
        }

        OverrideTable::from_entries(&self.overrides, &geometry)?;

        for range in &self.ranges {
            let width = range.text.graphemes(true).count();
            let fits = geometry
                .cell_at(range.row, range.col_offset)
                .is_some_and(|start| start.index() + width <= geometry.total_cells());
            if !fits {
                return Err(ConfigError::RangeOutOfGrid {
                    row: range.row,
                    col: range.col_offset,
                    total_cells: geometry.total_cells(),
                });
            }
        }
        Ok(())
    }
}
