//! Input code sequence: one slot per cell, decoded from UTF-16.
//!
//! The blob holds little-endian UTF-16 code units in cell order. A zero unit
//! marks an empty cell. A cell holds one grapheme cluster: a character outside
//! the BMP takes two units, and combining marks after a base character join
//! its cell, so the cell index and the read cursor advance independently.

use std::path::Path;

use log::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::GlyphRange;
use crate::error::{ConfigError, Error, Result};
use crate::glyph::GlyphRun;
use crate::grid::AtlasGeometry;

/// Content of one input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Zero sentinel: nothing to draw.
    Empty,
    Char(char),
    /// A base character followed by the marks that combine with it.
    Cluster(GlyphRun),
}

impl Slot {
    /// Slot for one grapheme cluster of text.
    pub fn from_cluster(text: &str) -> Self {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (None | Some('\0'), None) => Self::Empty,
            (Some(ch), None) => Self::Char(ch),
            _ => GlyphRun::new(text).map_or(Self::Empty, Self::Cluster),
        }
    }
}

/// A decoded slot plus the number of code units it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRead {
    pub slot: Slot,
    pub units: usize,
}

/// Iterator decoding UTF-16 units into per-cell slots.
#[derive(Debug, Clone)]
pub struct Utf16Slots<'a> {
    units: &'a [u16],
    pos: usize,
}

impl<'a> Utf16Slots<'a> {
    pub fn new(units: &'a [u16]) -> Self {
        Self { units, pos: 0 }
    }

    /// Code units consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The well-formed, non-zero character starting at unit `at`.
    fn char_at(&self, at: usize) -> Option<char> {
        let rest = self.units.get(at..)?;
        if rest.first().is_none_or(|&u| u == 0) {
            return None;
        }
        char::decode_utf16(rest.iter().copied()).next()?.ok()
    }
}

impl Iterator for Utf16Slots<'_> {
    type Item = SlotRead;

    fn next(&mut self) -> Option<SlotRead> {
        let start = self.pos;
        let rest = self.units.get(start..)?;
        let &first = rest.first()?;
        if first == 0 {
            self.pos += 1;
            return Some(SlotRead {
                slot: Slot::Empty,
                units: 1,
            });
        }

        let base = match char::decode_utf16(rest.iter().copied()).next()? {
            Ok(ch) => ch,
            Err(e) => {
                warn!(
                    "unpaired surrogate {:#06x} at code unit {start}, using U+FFFD",
                    e.unpaired_surrogate()
                );
                self.pos += 1;
                return Some(SlotRead {
                    slot: Slot::Char(char::REPLACEMENT_CHARACTER),
                    units: 1,
                });
            }
        };

        let mut cluster = String::from(base);
        let mut end = start + base.len_utf16();
        while let Some(next) = self.char_at(end) {
            cluster.push(next);
            if cluster.graphemes(true).nth(1).is_some() {
                cluster.pop();
                break;
            }
            end += next.len_utf16();
        }
        self.pos = end;
        Some(SlotRead {
            slot: Slot::from_cluster(&cluster),
            units: end - start,
        })
    }
}

/// The whole input, decoded up front: exactly one slot per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSequence {
    slots: Vec<Slot>,
}

impl InputSequence {
    /// Read and decode an input blob from disk.
    pub fn read(path: &Path, total_cells: usize) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        debug!("input: read {} bytes from {}", bytes.len(), path.display());
        Self::from_utf16_le(&bytes, total_cells)
    }

    /// Decode little-endian UTF-16 bytes into `total_cells` slots.
    ///
    /// At least `total_cells` code units must be present. If surrogate pairs
    /// exhaust the units early, the remaining cells are empty.
    pub fn from_utf16_le(bytes: &[u8], total_cells: usize) -> Result<Self> {
        if bytes.len() / 2 < total_cells {
            return Err(Error::InputTooShort {
                expected_units: total_cells,
                actual_bytes: bytes.len(),
            });
        }
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let mut reader = Utf16Slots::new(&units);
        let mut slots: Vec<Slot> = reader
            .by_ref()
            .take(total_cells)
            .map(|r| r.slot)
            .collect();
        if slots.len() < total_cells {
            warn!(
                "input: code units ran out after {} of {total_cells} cells; the rest stay empty",
                slots.len()
            );
            slots.resize(total_cells, Slot::Empty);
        }
        let unused = units.len() - reader.position();
        if unused > 0 {
            debug!("input: ignoring {unused} trailing code units");
        }
        Ok(Self { slots })
    }

    /// Build the sequence from literal glyph ranges instead of a blob.
    ///
    /// Each range fills consecutive cells, one grapheme cluster per cell,
    /// starting at `(row, col_offset)`.
    /// Later ranges overwrite earlier ones.
    pub fn from_ranges(ranges: &[GlyphRange], geometry: &AtlasGeometry) -> Result<Self> {
        let total_cells = geometry.total_cells();
        let mut slots = vec![Slot::Empty; total_cells];
        for range in ranges {
            let start = geometry
                .cell_at(range.row, range.col_offset)
                .ok_or(ConfigError::RangeOutOfGrid {
                    row: range.row,
                    col: range.col_offset,
                    total_cells,
                })?
                .index();
            for (i, cluster) in range.text.graphemes(true).enumerate() {
                let slot = slots.get_mut(start + i).ok_or(ConfigError::RangeOutOfGrid {
                    row: range.row,
                    col: range.col_offset + i,
                    total_cells,
                })?;
                *slot = Slot::from_cluster(cluster);
            }
        }
        Ok(Self { slots })
    }

    /// Slot for a cell index; indices past the end read as empty.
    pub fn get(&self, index: usize) -> Slot {
        self.slots.get(index).cloned().unwrap_or(Slot::Empty)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests;
