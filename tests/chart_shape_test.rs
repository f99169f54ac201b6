// Shape engine behavior through the public Chart API

use knit_chart_wasm::chart::{Chart, ShapeError};
use knit_chart_wasm::models::{ChartConfig, ParsedStitch, StitchCell, StitchKind};
use knit_chart_wasm::parse::{parse_instruction, ParseWarningKind};

fn chart(width: usize, height: usize) -> Chart {
    Chart::new(&ChartConfig {
        cast_on_count: width,
        row_count: height,
        ..ChartConfig::default()
    })
}

/// Every row holds cast-on plus the net effect of everything below it,
/// and all rows share the chart width.
fn assert_conserved(chart: &Chart) {
    let width = chart.width();
    let mut cumulative: i64 = 0;
    for row in chart.rows() {
        let expected = chart.cast_on_count() as i64 + cumulative;
        assert_eq!(
            row.real_stitch_count() as i64,
            expected,
            "row {} holds {} stitches, expected {}",
            row.row_number,
            row.real_stitch_count(),
            expected
        );
        assert_eq!(row.width(), width, "row {} width", row.row_number);
        assert!(row.warnings.is_empty(), "row {}: {:?}", row.row_number, row.warnings);
        cumulative += row.net_effect();
    }
}

#[test]
fn test_yarn_over_grows_every_row_above() {
    let mut c = chart(6, 5);
    c.place_stitch(2, 3, StitchKind::YarnOver, None).unwrap();

    for row in &c.rows()[..3] {
        assert_eq!(row.real_stitch_count(), 6, "row {}", row.row_number);
    }
    for row in &c.rows()[3..] {
        assert_eq!(row.real_stitch_count(), 7, "row {}", row.row_number);
        assert!(row.cells[6].is_placeholder());
    }
    // rows at or below the edit are padded with non-existent cells
    assert_eq!(c.rows()[0].cells[6].kind, StitchKind::NoStitch);
    assert_eq!(c.width(), 7);
    assert_conserved(&c);
}

#[test]
fn test_cable_fills_row_and_rejects_overflow() {
    let mut c = chart(4, 1);
    c.place_stitch(0, 0, StitchKind::Cable4Front, None).unwrap();

    let cells = &c.rows()[0].cells;
    assert_eq!(cells[0].kind, StitchKind::Cable4Front);
    for cell in &cells[1..4] {
        assert!(cell.is_cable_continuation);
        assert_eq!(cell.cable_origin, Some(0));
        assert_eq!(cell.kind, StitchKind::Empty);
    }

    let before = c.clone();
    let err = c.place_stitch(0, 2, StitchKind::Cable4Front, None).unwrap_err();
    assert_eq!(
        err,
        ShapeError::CableOverflow {
            stitch: StitchKind::Cable4Front,
            col: 2,
            needed: 4,
            available: 2,
        }
    );
    assert_eq!(c, before);
}

#[test]
fn test_clearing_any_cable_cell_clears_the_unit() {
    for target in 0..3 {
        let mut c = chart(5, 2);
        c.place_stitch(0, 1, StitchKind::Cable3Back, Some("CC2")).unwrap();
        c.clear_cell(0, 1 + target);

        let cells = &c.rows()[0].cells;
        assert!(cells.iter().all(StitchCell::is_placeholder), "clearing offset {}", target);
    }
}

#[test]
fn test_cable_cannot_cross_missing_cells() {
    let mut c = chart(4, 2);
    c.place_stitch(0, 0, StitchKind::KnitTwoTogether, None).unwrap();

    // row 2 now has 3 real cells followed by a non-existent one
    assert_eq!(c.rows()[1].cells[3].kind, StitchKind::NoStitch);
    assert!(matches!(
        c.place_stitch(1, 1, StitchKind::Cable3Front, None),
        Err(ShapeError::CableOverflow { available: 2, .. })
    ));
    assert_eq!(
        c.place_stitch(1, 3, StitchKind::Knit, None),
        Err(ShapeError::OutOfShape { row: 1, col: 3 })
    );
}

#[test]
fn test_decreases_then_increases_follow_lifo() {
    let mut c = chart(4, 2);
    c.place_stitch(0, 0, StitchKind::YarnOver, None).unwrap();
    c.place_stitch(0, 1, StitchKind::YarnOver, None).unwrap();
    assert_eq!(c.rows()[1].width(), 6);

    // the column added last is the first one retired
    c.place_stitch(0, 2, StitchKind::KnitTwoTogether, None).unwrap();
    let upper = &c.rows()[1];
    assert_eq!(upper.real_stitch_count(), 5);
    assert_eq!(c.width(), 5);
    assert!(upper.cells[4].exists());

    c.place_stitch(0, 3, StitchKind::KnitTwoTogether, None).unwrap();
    let upper = &c.rows()[1];
    assert_eq!(upper.real_stitch_count(), 4);
    assert!(upper.cells[3].exists());
    assert_eq!(c.width(), 4);

    // growing again revives the most recently retired column first
    c.clear_cell(0, 3);
    assert!(c.rows()[1].cells[4].exists());
    assert_conserved(&c);
}

#[test]
fn test_conservation_over_edit_sequence() {
    let mut c = chart(8, 6);
    let edits: &[(usize, usize, StitchKind)] = &[
        (0, 0, StitchKind::KnitFrontBack),
        (0, 7, StitchKind::MakeOneLeft),
        (1, 2, StitchKind::SlipSlipKnit),
        (1, 3, StitchKind::Cable4Back),
        (2, 0, StitchKind::CentralDoubleDecrease),
        (3, 1, StitchKind::YarnOver),
        (3, 2, StitchKind::YarnOver),
        (4, 0, StitchKind::KnitThreeTogether),
    ];

    for &(row, col, kind) in edits {
        c.place_stitch(row, col, kind, None).unwrap();
        assert_conserved(&c);
    }

    c.clear_cell(1, 4);
    assert_conserved(&c);
    c.clear_cell(3, 1);
    assert_conserved(&c);
    c.delete_row(2).unwrap();
    assert_conserved(&c);
    c.add_row(None);
    assert_conserved(&c);
}

#[test]
fn test_add_and_delete_rows_renumber() {
    let mut c = chart(3, 3);
    c.add_row(None);
    assert_eq!(c.height(), 4);
    assert!(!c.rows()[3].is_right_side);

    c.add_row(Some(false));
    assert!(!c.rows()[4].is_right_side);

    c.delete_row(1).unwrap();
    let numbers: Vec<usize> = c.rows().iter().map(|r| r.row_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn test_stuck_row_reports_warning() {
    let mut c = chart(3, 2);
    c.fill_row(1, StitchKind::Knit, None).unwrap();
    c.place_stitch(0, 0, StitchKind::KnitTwoTogether, None).unwrap();

    let upper = &c.rows()[1];
    assert_eq!(upper.expected_stitch_count, 2);
    assert_eq!(upper.real_stitch_count(), 3);
    assert_eq!(upper.warnings.len(), 1);
}

#[test]
fn test_apply_row_from_sequence_replays_left_to_right() {
    let mut c = chart(6, 2);
    let parsed = parse_instruction("k2, yo, k2tog, k2", None, c.palette());
    assert!(parsed.success);

    let report = c
        .apply_row_from_sequence(0, &parsed.stitches, "k2, yo, k2tog, k2")
        .unwrap();
    assert_eq!(report.placed, 6);
    assert!(report.skipped.is_empty());
    assert!(report.warnings.is_empty());

    let row = &c.rows()[0];
    assert_eq!(row.text_instruction.as_deref(), Some("k2, yo, k2tog, k2"));
    let kinds: Vec<StitchKind> = row.cells.iter().take(6).map(|cell| cell.kind).collect();
    assert_eq!(
        kinds,
        vec![
            StitchKind::Knit,
            StitchKind::Knit,
            StitchKind::YarnOver,
            StitchKind::KnitTwoTogether,
            StitchKind::Knit,
            StitchKind::Knit,
        ]
    );
    assert_eq!(c.rows()[1].real_stitch_count(), 6);
    assert_conserved(&c);
}

#[test]
fn test_apply_row_truncates_and_warns() {
    let mut c = chart(4, 1);
    let stitches = vec![ParsedStitch::new(StitchKind::Knit, None); 10];

    let report = c.apply_row_from_sequence(0, &stitches, "k10").unwrap();
    assert_eq!(report.placed, 4);
    assert_eq!(report.truncated, 6);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, ParseWarningKind::StitchCountMismatch);
}

#[test]
fn test_apply_row_skips_failing_cable() {
    let mut c = chart(5, 1);
    let stitches = vec![
        ParsedStitch::new(StitchKind::Knit, None),
        ParsedStitch::new(StitchKind::Knit, None),
        ParsedStitch::new(StitchKind::Cable4Front, None),
    ];

    let report = c.apply_row_from_sequence(0, &stitches, "k2, c4f").unwrap();
    assert_eq!(report.placed, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].column, 2);
    assert!(c.rows()[0].cells[2].is_placeholder());
}

#[test]
fn test_apply_row_out_of_range() {
    let mut c = chart(4, 1);
    assert!(c.apply_row_from_sequence(3, &[], "").is_err());
}
