use std::io::Write;

use super::{InputSequence, Slot, SlotRead, Utf16Slots};
use crate::config::GlyphRange;
use crate::error::Error;
use crate::glyph::GlyphRun;
use crate::grid::AtlasGeometry;

fn le_bytes(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|u| u.to_le_bytes()).collect()
}

#[test]
fn zero_unit_is_empty_slot() {
    let units = [0x0041, 0, 0x0042];
    let reads: Vec<SlotRead> = Utf16Slots::new(&units).collect();
    assert_eq!(
        reads,
        vec![
            SlotRead {
                slot: Slot::Char('A'),
                units: 1,
            },
            SlotRead {
                slot: Slot::Empty,
                units: 1,
            },
            SlotRead {
                slot: Slot::Char('B'),
                units: 1,
            },
        ]
    );
}

#[test]
fn surrogate_pair_consumes_two_units() {
    // U+1F600 followed by 'x'.
    let units = [0xD83D, 0xDE00, 0x0078];
    let mut it = Utf16Slots::new(&units);
    assert_eq!(
        it.next(),
        Some(SlotRead {
            slot: Slot::Char('\u{1F600}'),
            units: 2,
        })
    );
    assert_eq!(it.position(), 2);
    assert_eq!(
        it.next(),
        Some(SlotRead {
            slot: Slot::Char('x'),
            units: 1,
        })
    );
    assert_eq!(it.next(), None);
}

#[test]
fn unpaired_surrogate_becomes_replacement() {
    let units = [0xD800, 0x0041];
    let slots: Vec<Slot> = Utf16Slots::new(&units).map(|r| r.slot).collect();
    assert_eq!(slots, vec![Slot::Char('\u{FFFD}'), Slot::Char('A')]);
}

#[test]
fn cell_index_advances_once_per_slot() {
    // Four cells; the pair in slot 1 must not shift 'C' out of slot 2.
    let bytes = le_bytes(&[0x0041, 0xD83D, 0xDE00, 0x0043, 0, 0]);
    let input = InputSequence::from_utf16_le(&bytes, 4).expect("decodes");
    assert_eq!(input.get(0), Slot::Char('A'));
    assert_eq!(input.get(1), Slot::Char('\u{1F600}'));
    assert_eq!(input.get(2), Slot::Char('C'));
    assert_eq!(input.get(3), Slot::Empty);
}

#[test]
fn combining_mark_joins_its_base_cell() {
    let units: Vec<u16> = "e\u{301}B\0".encode_utf16().collect();
    let mut it = Utf16Slots::new(&units);
    let cluster = GlyphRun::new("e\u{301}").expect("non-empty");
    assert_eq!(
        it.next(),
        Some(SlotRead {
            slot: Slot::Cluster(cluster.clone()),
            units: 2,
        })
    );
    assert_eq!(it.position(), 2);

    let input = InputSequence::from_utf16_le(&le_bytes(&units), 3).expect("decodes");
    assert_eq!(input.get(0), Slot::Cluster(cluster));
    assert_eq!(input.get(1), Slot::Char('B'));
    assert_eq!(input.get(2), Slot::Empty);
}

#[test]
fn zero_unit_ends_a_cluster() {
    // A mark after the sentinel starts its own cell.
    let units = [0x0061, 0, 0x0301];
    let slots: Vec<Slot> = Utf16Slots::new(&units).map(|r| r.slot).collect();
    assert_eq!(
        slots,
        vec![Slot::Char('a'), Slot::Empty, Slot::Char('\u{301}')]
    );
}

#[test]
fn exhausted_units_leave_trailing_cells_empty() {
    let bytes = le_bytes(&[0xD83D, 0xDE00, 0xD83D, 0xDE01]);
    let input = InputSequence::from_utf16_le(&bytes, 4).expect("decodes");
    assert_eq!(input.len(), 4);
    assert_eq!(input.get(1), Slot::Char('\u{1F601}'));
    assert_eq!(input.get(2), Slot::Empty);
    assert_eq!(input.get(3), Slot::Empty);
}

#[test]
fn short_blob_is_fatal() {
    let bytes = le_bytes(&[0x0041, 0x0042]);
    let err = InputSequence::from_utf16_le(&bytes, 3).expect_err("too short");
    assert!(matches!(
        err,
        Error::InputTooShort {
            expected_units: 3,
            actual_bytes: 4,
        }
    ));
}

#[test]
fn read_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&le_bytes(&[0x0041, 0, 0x00B9]))
        .expect("write input");
    let input = InputSequence::read(file.path(), 3).expect("reads");
    assert_eq!(input.get(0), Slot::Char('A'));
    assert_eq!(input.get(1), Slot::Empty);
    assert_eq!(input.get(2), Slot::Char('¹'));
    assert_eq!(input.get(3), Slot::Empty, "past the end reads empty");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = InputSequence::read(&dir.path().join("input.bin"), 1).expect_err("missing");
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn ranges_fill_cells_from_offset() {
    let geometry = AtlasGeometry::new(192, 48, 48, 12).expect("valid geometry");
    let ranges = vec![
        GlyphRange {
            row: 0,
            col_offset: 1,
            text: "ab".to_owned(),
        },
        GlyphRange {
            row: 1,
            col_offset: 0,
            text: "xyz".to_owned(),
        },
        GlyphRange {
            row: 0,
            col_offset: 2,
            text: "B".to_owned(),
        },
    ];
    let input = InputSequence::from_ranges(&ranges, &geometry).expect("fits");
    assert_eq!(input.get(0), Slot::Empty);
    assert_eq!(input.get(1), Slot::Char('a'));
    assert_eq!(input.get(2), Slot::Char('B'), "later range wins");
    assert_eq!(input.get(4), Slot::Char('x'));
    assert_eq!(input.get(6), Slot::Char('z'));
    assert_eq!(input.get(7), Slot::Empty);
}

#[test]
fn range_past_grid_end_is_rejected() {
    let geometry = AtlasGeometry::new(96, 48, 48, 4).expect("valid geometry");
    let ranges = vec![GlyphRange {
        row: 1,
        col_offset: 1,
        text: "ab".to_owned(),
    }];
    let err = InputSequence::from_ranges(&ranges, &geometry).expect_err("overflows");
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn ranges_place_one_cluster_per_cell() {
    let geometry = AtlasGeometry::new(96, 48, 48, 4).expect("valid geometry");
    let ranges = vec![GlyphRange {
        row: 0,
        col_offset: 0,
        text: "a\u{308}\0b".to_owned(),
    }];
    let input = InputSequence::from_ranges(&ranges, &geometry).expect("fits");
    assert_eq!(
        input.get(0),
        Slot::Cluster(GlyphRun::new("a\u{308}").expect("non-empty"))
    );
    assert_eq!(input.get(1), Slot::Empty);
    assert_eq!(input.get(2), Slot::Char('b'));
}
