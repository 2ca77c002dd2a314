//! Error types for atlas generation.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal errors. Any of these aborts the run; there is no partial recovery.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to parse {}: {source}", path.display())]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("font family not found: {family}")]
    FontNotFound { family: String },

    #[error("not a usable font file: {} (face {index})", path.display())]
    FontParse { path: PathBuf, index: u32 },

    #[error("input holds {actual_bytes} bytes, need {expected_units} UTF-16 code units")]
    InputTooShort {
        expected_units: usize,
        actual_bytes: usize,
    },

    #[error("width {value} of cell {index} does not fit in one byte")]
    WidthOverflow { index: usize, value: i64 },

    #[error("no font has a glyph for {ch:?} (U+{:04X}) in cell {index}", u32::from(*ch))]
    MissingGlyph { index: usize, ch: char },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    /// Wrap an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration values that cannot describe a valid atlas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("cell width {cell_width} exceeds texture width {texture_width}")]
    CellWiderThanTexture { cell_width: u32, texture_width: u32 },

    #[error("{rows} rows of {cell_height}px do not fit a texture height")]
    TextureTooTall { rows: usize, cell_height: u32 },

    #[error("outline stroke range {min}..{max} is empty")]
    EmptyOutlineRange { min: u32, max: u32 },

    #[error("width multiplier must be a positive finite number")]
    BadMultiplier,

    #[error("font size must be a positive finite number")]
    BadFontSize,

    #[error("override for {key} has empty text")]
    EmptyOverride { key: String },

    #[error("override key {key} lies outside the {total_cells}-cell grid")]
    OverrideOutOfGrid { key: String, total_cells: usize },

    #[error("cell {index} has more than one override")]
    DuplicateOverride { index: usize },

    #[error("range at row {row} column {col} lies outside the {total_cells}-cell grid")]
    RangeOutOfGrid {
        row: usize,
        col: usize,
        total_cells: usize,
    },
}
