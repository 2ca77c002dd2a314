//! Per-cell glyph source resolution: what to draw and with which font.

use std::collections::BTreeMap;

use log::debug;

use crate::config::OverrideEntry;
use crate::error::ConfigError;
use crate::glyph::{FaceChoice, FontSelection, GlyphAvailability, GlyphRun};
use crate::grid::{AtlasGeometry, Cell};
use crate::input::Slot;

/// Replacement runs keyed by cell index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    runs: BTreeMap<usize, GlyphRun>,
}

impl OverrideTable {
    /// Resolve configured entries against the grid.
    pub fn from_entries(
        entries: &[OverrideEntry],
        geometry: &AtlasGeometry,
    ) -> Result<Self, ConfigError> {
        let mut runs = BTreeMap::new();
        for entry in entries {
            let cell = match *entry {
                OverrideEntry::Cell { row, col, .. } => geometry.cell_at(row, col),
                OverrideEntry::Index { index, .. } => geometry.cell(index),
            }
            .ok_or_else(|| ConfigError::OverrideOutOfGrid {
                key: entry.key(),
                total_cells: geometry.total_cells(),
            })?;
            let run = GlyphRun::new(entry.text())
                .ok_or_else(|| ConfigError::EmptyOverride { key: entry.key() })?;
            if runs.insert(cell.index(), run).is_some() {
                return Err(ConfigError::DuplicateOverride {
                    index: cell.index(),
                });
            }
        }
        Ok(Self { runs })
    }

    pub fn get(&self, index: usize) -> Option<&GlyphRun> {
        self.runs.get(&index)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Where a cell's run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSource {
    Input,
    Override,
}

/// A populated cell: the run to draw and the face to draw it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCell {
    pub run: GlyphRun,
    pub source: CellSource,
    pub face: FaceChoice,
    /// No configured font covers every codepoint of the run.
    pub missing: bool,
}

/// Decides the content of each cell.
#[derive(Debug, Clone, Default)]
pub struct GlyphResolver {
    overrides: OverrideTable,
}

impl GlyphResolver {
    pub fn new(overrides: OverrideTable) -> Self {
        Self { overrides }
    }

    /// Content of `cell` given its input slot, or `None` for an empty cell.
    ///
    /// An override wins over the slot, even when the slot is empty.
    pub fn resolve<F: GlyphAvailability>(
        &self,
        cell: Cell,
        slot: Slot,
        fonts: &FontSelection<F>,
    ) -> Option<ResolvedCell> {
        let (run, source) = match (self.overrides.get(cell.index()), slot) {
            (Some(run), _) => (run.clone(), CellSource::Override),
            (None, Slot::Char(ch)) => (GlyphRun::single(ch), CellSource::Input),
            (None, Slot::Cluster(run)) => (run, CellSource::Input),
            (None, Slot::Empty) => return None,
        };
        let (face, missing) = choose_face(&run, fonts);
        if source == CellSource::Override {
            debug!("cell {cell}: override {:?}", run.as_str());
        }
        Some(ResolvedCell {
            run,
            source,
            face,
            missing,
        })
    }
}

/// Pick the primary font if it covers `run`, else a covering fallback, else
/// the primary flagged as missing.
pub fn choose_face<F: GlyphAvailability>(
    run: &GlyphRun,
    fonts: &FontSelection<F>,
) -> (FaceChoice, bool) {
    if fonts.primary().covers(run) {
        return (FaceChoice::Primary, false);
    }
    match fonts.fallback() {
        Some(fallback) if fallback.covers(run) => (FaceChoice::Fallback, false),
        _ => (FaceChoice::Primary, true),
    }
}
