//! Width quantization into the engine's one-byte width unit.
//!
//! The engine stores `ceil(advance / multiplier) + 1` per cell. Values that
//! do not fit a byte are handled per [`OverflowPolicy`].

use crate::config::{OverflowPolicy, WidthConfig};
use crate::glyph::RawMetrics;
use crate::grid::Cell;

/// A quantized width byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantized {
    pub byte: u8,
    /// The unclamped value, when it did not fit and was saturated or wrapped.
    pub overflowed: Option<i64>,
}

/// A scaled width the policy refused to squeeze into a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub value: i64,
}

/// Converts raw metrics into width bytes.
#[derive(Debug, Clone, Copy)]
pub struct WidthQuantizer {
    multiplier: f64,
    overflow: OverflowPolicy,
}

impl WidthQuantizer {
    pub fn new(multiplier: f64, overflow: OverflowPolicy) -> Self {
        Self {
            multiplier,
            overflow,
        }
    }

    pub fn from_config(config: &WidthConfig) -> Self {
        Self::new(config.multiplier, config.overflow)
    }

    /// Unclamped engine width for `metrics`.
    pub fn scaled(&self, metrics: RawMetrics) -> i64 {
        (f64::from(metrics.advance()) / self.multiplier).ceil() as i64 + 1
    }

    pub fn quantize(&self, metrics: RawMetrics) -> Result<Quantized, OutOfRange> {
        let value = self.scaled(metrics);
        if let Ok(byte) = u8::try_from(value) {
            return Ok(Quantized {
                byte,
                overflowed: None,
            });
        }
        let byte = match self.overflow {
            OverflowPolicy::Saturate => value.clamp(0, 255) as u8,
            OverflowPolicy::Wrap => value as u8,
            OverflowPolicy::Reject => return Err(OutOfRange { value }),
        };
        Ok(Quantized {
            byte,
            overflowed: Some(value),
        })
    }
}

/// One width byte per cell, zero for empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthTable {
    bytes: Vec<u8>,
}

impl WidthTable {
    pub fn new(total_cells: usize) -> Self {
        Self {
            bytes: vec![0; total_cells],
        }
    }

    pub fn set(&mut self, cell: Cell, byte: u8) {
        if let Some(slot) = self.bytes.get_mut(cell.index()) {
            *slot = byte;
        }
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
