//! Global shape recompute
//!
//! Walks the rows bottom to top accumulating the net stitch effect, derives
//! each row's expected real-stitch count and reconciles the row against it by
//! flipping empty placeholders and non-existent cells. Stitched cells and
//! cable cells are never touched. Afterwards every row is trimmed or padded
//! with non-existent cells to the common chart width.
//!
//! Shrinking retires the rightmost placeholders first; growing revives the
//! most recently retired cell first (the leftmost non-existent cell), then
//! appends fresh placeholders at the right edge.

use crate::models::{Row, StitchCell};

/// Recompute expected counts and reconcile every row. Total over any chart state.
pub fn recompute(rows: &mut [Row], cast_on_count: usize) {
    let mut cumulative: i64 = 0;

    for row in rows.iter_mut() {
        let expected = (cast_on_count as i64 + cumulative).max(0) as usize;
        row.expected_stitch_count = expected;
        reconcile_row(row, expected);

        // Placeholders and non-existent cells are both net 0, so reconciling
        // does not change what this row hands upward.
        cumulative += row.net_effect();
    }

    let width = rows.iter().map(Row::shape_extent).max().unwrap_or(0);

    for row in rows.iter_mut() {
        fit_to_width(row, width);
        refresh_warnings(row);
    }

    log::debug!(
        "Shape recomputed: {} rows, width {}, top row expects {}",
        rows.len(),
        width,
        rows.last().map(|r| r.expected_stitch_count).unwrap_or(cast_on_count)
    );
}

/// Bring a row's real-cell count to `expected` as far as placeholders allow
pub fn reconcile_row(row: &mut Row, expected: usize) {
    let actual = row.real_stitch_count();

    if actual > expected {
        let mut excess = actual - expected;
        for cell in row.cells.iter_mut().rev() {
            if excess == 0 {
                break;
            }
            if cell.is_placeholder() {
                *cell = StitchCell::no_stitch();
                excess -= 1;
            }
        }
    } else if actual < expected {
        let mut missing = expected - actual;
        for cell in row.cells.iter_mut() {
            if missing == 0 {
                break;
            }
            if !cell.exists() {
                *cell = StitchCell::empty();
                missing -= 1;
            }
        }
        row.cells
            .extend(std::iter::repeat(StitchCell::empty()).take(missing));
    }
}

/// Trim trailing non-existent cells past `width`, pad with them up to it
fn fit_to_width(row: &mut Row, width: usize) {
    while row.cells.len() > width && row.cells.last().map_or(false, |c| !c.exists()) {
        row.cells.pop();
    }
    if row.cells.len() < width {
        row.cells.resize(width, StitchCell::no_stitch());
    }
}

fn refresh_warnings(row: &mut Row) {
    row.warnings.clear();
    let actual = row.real_stitch_count();
    if actual != row.expected_stitch_count {
        row.warnings.push(format!(
            "Row {}: expected {} stitches but the chart holds {}",
            row.row_number, row.expected_stitch_count, actual
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StitchKind;

    fn rows(count: usize, width: usize) -> Vec<Row> {
        (0..count).map(|i| Row::new(i + 1, width, i % 2 == 0)).collect()
    }

    #[test]
    fn test_plain_chart_is_unchanged() {
        let mut chart = rows(3, 5);
        let before = chart.clone();
        recompute(&mut chart, 5);
        assert_eq!(chart, before);
    }

    #[test]
    fn test_increase_grows_rows_above_and_pads_below() {
        let mut chart = rows(3, 4);
        chart[0].cells[0] = StitchCell::new(StitchKind::YarnOver, None);
        recompute(&mut chart, 4);

        assert_eq!(chart[0].width(), 5);
        assert_eq!(chart[0].real_stitch_count(), 4);
        assert_eq!(chart[0].cells[4].kind, StitchKind::NoStitch);
        assert_eq!(chart[1].real_stitch_count(), 5);
        assert_eq!(chart[2].real_stitch_count(), 5);
        assert_eq!(chart[2].expected_stitch_count, 5);
    }

    #[test]
    fn test_decrease_retires_rightmost_placeholders() {
        let mut chart = rows(2, 4);
        chart[0].cells[1] = StitchCell::new(StitchKind::KnitTwoTogether, None);
        chart[1].cells[0] = StitchCell::new(StitchKind::Knit, None);
        recompute(&mut chart, 4);

        assert_eq!(chart[1].width(), 4);
        assert_eq!(chart[1].real_stitch_count(), 3);
        assert_eq!(chart[1].cells[3].kind, StitchKind::NoStitch);
        assert_eq!(chart[1].cells[0].kind, StitchKind::Knit);
    }

    #[test]
    fn test_stitched_cells_are_never_retired() {
        let mut chart = rows(2, 2);
        chart[0].cells[0] = StitchCell::new(StitchKind::KnitTwoTogether, None);
        chart[1].cells[0] = StitchCell::new(StitchKind::Knit, None);
        chart[1].cells[1] = StitchCell::new(StitchKind::Purl, None);
        recompute(&mut chart, 2);

        assert_eq!(chart[1].real_stitch_count(), 2);
        assert_eq!(chart[1].expected_stitch_count, 1);
        assert_eq!(chart[1].warnings.len(), 1);
    }

    #[test]
    fn test_growth_revives_retired_cells_first() {
        let mut row = Row::new(1, 5, true);
        row.cells[3] = StitchCell::no_stitch();
        row.cells[4] = StitchCell::no_stitch();
        reconcile_row(&mut row, 4);
        assert!(row.cells[3].exists());
        assert!(!row.cells[4].exists());
    }
}
