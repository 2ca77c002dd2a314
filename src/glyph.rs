//! Glyph runs, horizontal metrics and the font seam the pipeline renders through.
//!
//! The pipeline never touches a font file directly. It asks a [`FontFace`]
//! for metrics and for a glyph path, which keeps the core independent of the
//! rasterization backend (and lets tests substitute a synthetic face).

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::grid::Point;
use crate::raster::GlyphPath;

/// One or more codepoints rendered together into a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphRun {
    text: String,
}

impl GlyphRun {
    /// A run from literal text. `None` for empty text.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.is_empty()).then_some(Self { text })
    }

    pub fn single(ch: char) -> Self {
        Self {
            text: ch.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> std::str::Chars<'_> {
        self.text.chars()
    }

    /// Number of codepoints in the run (always at least one).
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_single(&self) -> bool {
        self.len() == 1
    }
}

/// Horizontal glyph metrics in whole pixels.
///
/// `leading` is the distance from the pen position to the left edge of the
/// ink (negative when the glyph hangs left of its origin), `body` is the ink
/// width, `trailing` is the distance from the ink's right edge to the next
/// pen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawMetrics {
    pub leading: i32,
    pub body: i32,
    pub trailing: i32,
}

impl RawMetrics {
    pub const fn new(leading: i32, body: i32, trailing: i32) -> Self {
        Self {
            leading,
            body,
            trailing,
        }
    }

    /// Advance width with negative overhangs clamped away.
    pub fn advance(self) -> i32 {
        self.leading.max(0) + self.body + self.trailing.max(0)
    }

    /// Rightward shift needed so a left-overhanging glyph starts at its origin.
    pub fn left_correction(self) -> i32 {
        (-self.leading).max(0)
    }
}

impl Add for RawMetrics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            leading: self.leading + rhs.leading,
            body: self.body + rhs.body,
            trailing: self.trailing + rhs.trailing,
        }
    }
}

impl AddAssign for RawMetrics {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for RawMetrics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Vertical font metrics in design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalMetrics {
    /// Maximum extent below the baseline.
    pub cell_descent: u16,
    pub em_height: u16,
}

impl VerticalMetrics {
    /// Descent converted to pixels at `size`.
    pub fn descent_px(self, size: f32) -> f32 {
        if self.em_height == 0 {
            return 0.0;
        }
        size * f32::from(self.cell_descent) / f32::from(self.em_height)
    }
}

/// Coverage query: does this font have a real glyph for a codepoint?
pub trait GlyphAvailability {
    fn has_glyph(&self, ch: char) -> bool;

    /// Whether every codepoint of `run` is covered.
    fn covers(&self, run: &GlyphRun) -> bool {
        run.chars().all(|ch| self.has_glyph(ch))
    }
}

/// A font at a fixed pixel size, as seen by the render pipeline.
pub trait FontFace: GlyphAvailability {
    /// Name for diagnostics.
    fn name(&self) -> &str;

    /// Pixel size the face renders at.
    fn size(&self) -> f32;

    fn vertical_metrics(&self) -> VerticalMetrics;

    /// Horizontal metrics of the glyph `ch` maps to (the missing-glyph shape
    /// when the face has none).
    fn char_metrics(&mut self, ch: char) -> RawMetrics;

    /// Outline of `run` laid out left to right with its baseline starting at
    /// `origin`, in atlas pixel space.
    fn run_path(&mut self, run: &GlyphRun, origin: Point) -> GlyphPath;
}

/// Which of the configured fonts renders a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceChoice {
    Primary,
    Fallback,
}

/// The primary font and the optional fallback, fixed for the whole run.
pub struct FontSelection<F> {
    primary: F,
    fallback: Option<F>,
}

impl<F> FontSelection<F> {
    pub fn new(primary: F, fallback: Option<F>) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &F {
        &self.primary
    }

    pub fn fallback(&self) -> Option<&F> {
        self.fallback.as_ref()
    }

    /// The face for `choice`; the primary when no fallback is configured.
    pub fn face_mut(&mut self, choice: FaceChoice) -> &mut F {
        match (choice, self.fallback.as_mut()) {
            (FaceChoice::Fallback, Some(fallback)) => fallback,
            _ => &mut self.primary,
        }
    }
}
