use super::{RenderStats, render};
use crate::config::{Config, MissingGlyphPolicy, OverflowPolicy, OverrideEntry};
use crate::error::Error;
use crate::glyph::{FontSelection, RawMetrics};
use crate::input::InputSequence;
use crate::testing::{FakeFace, INK_HEIGHT};

/// 2x2 grid of 48px cells on a 96px texture, no overrides.
fn small_config() -> Config {
    let mut config = Config::default();
    config.atlas.texture_width = 96;
    config.atlas.total_cells = 4;
    config.overrides.clear();
    config
}

fn input(text: &str) -> InputSequence {
    let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    InputSequence::from_utf16_le(&bytes, 4).expect("enough units")
}

fn latin() -> FakeFace {
    FakeFace::new("latin")
        .with_glyph('A', RawMetrics::new(0, 20, 2))
        .with_glyph('B', RawMetrics::new(0, 28, 2))
        .with_glyph('¹', RawMetrics::new(1, 8, 1))
        .with_glyph('𝄞', RawMetrics::new(2, 30, 4))
}

fn cjk() -> FakeFace {
    FakeFace::new("cjk").with_glyph('黴', RawMetrics::new(1, 36, 1))
}

fn fonts() -> FontSelection<FakeFace> {
    FontSelection::new(latin(), None)
}

#[test]
fn single_glyph_lands_in_cell_zero() {
    let atlas = render(&small_config(), &input("A\0\0\0"), &mut fonts()).expect("render");

    // Cell origin (1, 48), 10px descent + 5px margin: baseline at y = 33.
    assert_eq!(atlas.fill.alpha(10, 20), 255);
    assert_eq!(atlas.fill.alpha(1, 32), 255);
    assert_eq!(atlas.fill.alpha(0, 20), 0);
    assert_eq!(atlas.fill.alpha(10, 33), 0);
    assert_eq!(atlas.fill.alpha(10, 12), 0);

    // ceil(22 / 1.5) + 1
    assert_eq!(atlas.widths.as_bytes(), &[16, 0, 0, 0]);
    assert_eq!(
        atlas.stats,
        RenderStats {
            populated: 1,
            empty: 3,
            ..RenderStats::default()
        }
    );
}

#[test]
fn outline_is_a_ring_offset_from_the_fill() {
    let atlas = render(&small_config(), &input("A\0\0\0"), &mut fonts()).expect("render");
    // Outline origin is 4px right of the fill origin; the ring hugs the
    // rectangle 5..25 x 13..33 and leaves its middle clear.
    assert!(atlas.outline.alpha(25, 20) > 0);
    assert!(atlas.outline.alpha(5, 20) > 0);
    assert_eq!(atlas.outline.alpha(15, 23), 0);
    assert!(atlas.outline.is_clear((40, 0, 96, 96)));
}

#[test]
fn empty_cell_has_zero_width_and_no_pixels() {
    let atlas = render(&small_config(), &input("A\0BA"), &mut fonts()).expect("render");
    assert_eq!(atlas.widths.get(1), Some(0));
    assert!(atlas.fill.is_clear((48, 0, 96, 48)));
    assert!(atlas.outline.is_clear((48, 0, 96, 48)));
    assert_eq!(atlas.widths.get(2), Some(21));
    assert_eq!(atlas.stats.empty, 1);
    assert_eq!(atlas.stats.populated, 3);
}

#[test]
fn override_wins_over_empty_slot() {
    let mut config = small_config();
    config.overrides = vec![OverrideEntry::Index {
        index: 2,
        text: "¹¹".to_owned(),
    }];
    let atlas = render(&config, &input("\0\0\0\0"), &mut fonts()).expect("render");
    // (2, 16, 2) summed: advance 20, ceil(20 / 1.5) + 1.
    assert_eq!(atlas.widths.as_bytes(), &[0, 0, 15, 0]);
    assert_eq!(atlas.stats.overridden, 1);
    assert!(!atlas.fill.is_clear((0, 48, 48, 96)));
}

#[test]
fn override_wins_over_input_char() {
    let mut config = small_config();
    config.overrides = vec![OverrideEntry::Cell {
        row: 0,
        col: 0,
        text: "¹".to_owned(),
    }];
    let atlas = render(&config, &input("B\0\0\0"), &mut fonts()).expect("render");
    // '¹' advance 10, not 'B' advance 30.
    assert_eq!(atlas.widths.get(0), Some(8));
}

#[test]
fn surrogate_pairs_keep_later_cells_aligned() {
    let atlas = render(&small_config(), &input("𝄞B\0A\0"), &mut fonts()).expect("render");
    // 𝄞 advance 36 → 25, B advance 30 → 21, A advance 22 → 16.
    assert_eq!(atlas.widths.as_bytes(), &[25, 21, 0, 16]);
}

#[test]
fn fallback_font_draws_uncovered_glyph() {
    let mut fonts = FontSelection::new(latin(), Some(cjk()));
    let atlas = render(&small_config(), &input("黴A\0\0"), &mut fonts).expect("render");
    // Metrics come from the fallback: advance 38 → 27.
    assert_eq!(atlas.widths.as_bytes(), &[27, 16, 0, 0]);
    assert_eq!(atlas.stats.fallback, 1);
    assert_eq!(fonts.fallback().map(FakeFace::metric_queries), Some(1));
    assert_eq!(fonts.primary().metric_queries(), 1);
}

#[test]
fn missing_glyph_renders_notdef_by_default() {
    let atlas = render(&small_config(), &input("Z\0\0\0"), &mut fonts()).expect("render");
    // Notdef (1, 10, 1): advance 12 → 9.
    assert_eq!(atlas.widths.get(0), Some(9));
    assert_eq!(atlas.stats.missing, 1);
    assert!(!atlas.fill.is_clear((0, 0, 48, 48)));
}

#[test]
fn missing_glyph_can_be_skipped() {
    let mut config = small_config();
    config.glyphs.missing = MissingGlyphPolicy::Skip;
    let atlas = render(&config, &input("Z\0\0\0"), &mut fonts()).expect("render");
    assert_eq!(atlas.widths.get(0), Some(0));
    assert!(atlas.fill.is_clear((0, 0, 48, 48)));
    assert_eq!(atlas.stats.skipped, 1);
    assert_eq!(atlas.stats.populated, 0);
}

#[test]
fn missing_glyph_can_be_rejected() {
    let mut config = small_config();
    config.glyphs.missing = MissingGlyphPolicy::Reject;
    let err = render(&config, &input("AZ\0\0"), &mut fonts())
        .err()
        .expect("missing glyph");
    assert!(matches!(err, Error::MissingGlyph { index: 1, ch: 'Z' }));
}

#[test]
fn overflowing_width_follows_policy() {
    let wide = || {
        let face = FakeFace::new("wide").with_glyph('W', RawMetrics::new(0, 400, 0));
        FontSelection::new(face, None)
    };
    // ceil(400 / 1.5) + 1 = 268
    let mut config = small_config();
    let atlas = render(&config, &input("W\0\0\0"), &mut wide()).expect("render");
    assert_eq!(atlas.widths.get(0), Some(255));
    assert_eq!(atlas.stats.overflowed, 1);

    config.width.overflow = OverflowPolicy::Wrap;
    let atlas = render(&config, &input("W\0\0\0"), &mut wide()).expect("render");
    assert_eq!(atlas.widths.get(0), Some(12));

    config.width.overflow = OverflowPolicy::Reject;
    let err = render(&config, &input("W\0\0\0"), &mut wide())
        .err()
        .expect("overflow");
    assert!(matches!(
        err,
        Error::WidthOverflow {
            index: 0,
            value: 268,
        }
    ));
}

#[test]
fn descent_moves_the_baseline() {
    let mut fonts = FontSelection::new(latin().with_descent(0), None);
    let atlas = render(&small_config(), &input("A\0\0\0"), &mut fonts).expect("render");
    // No descent: baseline at 48 - 5 = 43.
    let top = (43.0 - INK_HEIGHT) as u32;
    assert_eq!(atlas.fill.alpha(10, top), 255);
    assert_eq!(atlas.fill.alpha(10, top - 1), 0);
    assert_eq!(atlas.fill.alpha(10, 42), 255);
}

#[test]
fn rendering_is_deterministic() {
    let config = small_config();
    let text = "AB¹𝄞";
    let first = render(&config, &input(text), &mut fonts()).expect("render");
    let second = render(&config, &input(text), &mut fonts()).expect("render");
    assert!(first.fill == second.fill);
    assert!(first.outline == second.outline);
    assert_eq!(first.widths, second.widths);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn bad_override_is_a_config_error() {
    let mut config = small_config();
    config.overrides = vec![OverrideEntry::Index {
        index: 4,
        text: "x".to_owned(),
    }];
    let err = render(&config, &input("\0\0\0\0"), &mut fonts())
        .err()
        .expect("out of grid");
    assert!(matches!(err, Error::Config(_)));
}
