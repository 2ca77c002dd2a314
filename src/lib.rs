//! Fixed-grid bitmap font atlas generator.
//!
//! Renders a fill atlas, a soft outline atlas and a one-byte-per-cell width
//! table from a UTF-16 character sequence, for an engine that looks glyphs
//! up by cell index.

pub mod config;
pub mod error;
pub mod export;
pub mod font;
pub mod glyph;
pub mod grid;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod placement;
pub mod raster;
pub mod resolver;
pub mod width;

#[cfg(test)]
mod testing;
