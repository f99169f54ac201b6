//! Chart shape engine
//!
//! `Chart` owns the rows of a knitting chart and is the only place they are
//! mutated. Every mutation ends with a global shape recompute, so after any
//! operation each row's real-stitch count equals the cast-on count plus the
//! net effect of every stitch below it (as far as placeholders allow), and all
//! rows share one width.

pub mod errors;
pub mod shape;
pub mod snapshot;

pub use errors::{ChartError, ShapeError};
pub use snapshot::ChartSnapshot;

use serde::{Deserialize, Serialize};

use crate::models::{
    ChartConfig, ChartStructure, ColorDefinition, Palette, ParsedStitch, Row, StitchCell,
    StitchKind,
};
use crate::parse::ParseWarning;
use crate::renderers::{serialize_row, SerializedRow};

/// A placement skipped while replaying a stitch sequence
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedPlacement {
    /// Index into the replayed sequence
    pub index: usize,
    pub column: usize,
    pub reason: String,
}

/// What happened when a stitch sequence was replayed into a row
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub placed: usize,
    pub skipped: Vec<SkippedPlacement>,

    /// Stitches left over once the cursor ran past the row
    pub truncated: usize,

    pub warnings: Vec<ParseWarning>,
}

/// An editable knitting chart
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    name: String,
    rows: Vec<Row>,
    cast_on_count: usize,
    structure: ChartStructure,
    palette: Palette,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new(&ChartConfig::default())
    }
}

impl Chart {
    /// Create a chart of `row_count` empty rows, `cast_on_count` wide
    pub fn new(config: &ChartConfig) -> Self {
        let rows = (0..config.row_count)
            .map(|i| Row::new(i + 1, config.cast_on_count, config.structure.side_for_row(i)))
            .collect();

        log::info!(
            "Creating chart \"{}\": {} rows x {} stitches",
            config.name,
            config.row_count,
            config.cast_on_count
        );

        Self {
            name: config.name.clone(),
            rows,
            cast_on_count: config.cast_on_count,
            structure: config.structure,
            palette: config.palette.clone(),
        }
    }

    /// Replace this chart with a fresh default one
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&StitchCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Current grid width (shared by every row)
    pub fn width(&self) -> usize {
        self.rows.first().map(Row::width).unwrap_or(self.cast_on_count)
    }

    pub fn cast_on_count(&self) -> usize {
        self.cast_on_count
    }

    pub fn structure(&self) -> ChartStructure {
        self.structure
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    // ========================================================================
    // Palette
    // ========================================================================

    pub fn add_color(&mut self, color: ColorDefinition) -> bool {
        self.palette.add(color)
    }

    /// Remove a palette color; cells keep their (now dangling) color ids
    pub fn remove_color(&mut self, id: &str) -> Option<ColorDefinition> {
        self.palette.remove(id)
    }

    // ========================================================================
    // Cell edits
    // ========================================================================

    /// Place a stitch at (row, col).
    ///
    /// Cables write an origin cell plus continuation cells over their whole
    /// span. Any cable already overlapping the written cells is dissolved
    /// first. Rejected placements leave the chart unchanged.
    pub fn place_stitch(
        &mut self,
        row: usize,
        col: usize,
        kind: StitchKind,
        color_id: Option<&str>,
    ) -> Result<(), ShapeError> {
        let target = self.rows.get(row).and_then(|r| r.cells.get(col));
        if !target.map_or(false, StitchCell::exists) {
            log::warn!("place_stitch({}, {}, {}): out of shape", row, col, kind);
            return Err(ShapeError::OutOfShape { row, col });
        }

        match kind {
            StitchKind::NoStitch => return Err(ShapeError::SentinelKind { stitch: kind }),
            StitchKind::Empty => {
                self.clear_cell(row, col);
                return Ok(());
            }
            _ => {}
        }

        let span = kind.span();
        let available = self.rows[row].contiguous_real_cells_from(col);
        if span > available {
            log::warn!("{} at ({}, {}) overflows: {} of {} cells", kind, row, col, available, span);
            return Err(ShapeError::CableOverflow {
                stitch: kind,
                col,
                needed: span,
                available,
            });
        }

        let cells = &mut self.rows[row].cells;
        dissolve_cables(cells, col, col + span);

        cells[col] = StitchCell::new(kind, color_id);
        for offset in 1..span {
            cells[col + offset] = StitchCell::cable_continuation(col, color_id);
        }

        log::debug!("Placed {} at ({}, {})", kind, row, col);
        self.recompute_shape();
        Ok(())
    }

    /// Reset a cell (or the whole cable unit it belongs to) to an empty
    /// placeholder, then recompute the shape.
    ///
    /// Clearing a non-existent cell does nothing.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        let Some(cells) = self.rows.get_mut(row).map(|r| &mut r.cells) else {
            log::warn!("clear_cell: row {} out of range", row);
            return;
        };
        match cells.get(col) {
            Some(cell) if cell.exists() => {}
            _ => {
                log::debug!("clear_cell({}, {}): nothing to clear", row, col);
                return;
            }
        }

        dissolve_cables(cells, col, col + 1);
        cells[col] = StitchCell::empty();

        self.recompute_shape();
    }

    /// Place the same stitch across every real cell of a row.
    /// Cables tile by their span; any remainder is left empty.
    pub fn fill_row(
        &mut self,
        row: usize,
        kind: StitchKind,
        color_id: Option<&str>,
    ) -> Result<ApplyReport, ChartError> {
        let real = self.row_checked(row)?.real_stitch_count();
        let stitch = ParsedStitch::new(kind, color_id);
        let sequence = vec![stitch; real / kind.span()];

        self.rows[row].clear_real_cells();
        self.rows[row].text_instruction = None;
        self.recompute_shape();
        Ok(self.replay(row, &sequence))
    }

    // ========================================================================
    // Rows and grid
    // ========================================================================

    /// Append a row at the current width. The side alternates from the
    /// previous row unless given (circular charts are always right side).
    pub fn add_row(&mut self, is_right_side: Option<bool>) {
        let index = self.rows.len();
        let side = is_right_side.unwrap_or_else(|| match self.rows.last() {
            Some(prev) if self.structure.kind == crate::models::StructureKind::Flat => {
                !prev.is_right_side
            }
            _ => self.structure.side_for_row(index),
        });

        self.rows.push(Row::new(index + 1, self.width(), side));
        log::info!("Added row {} ({})", index + 1, if side { "RS" } else { "WS" });
        self.recompute_shape();
    }

    /// Remove a row and renumber the rest
    pub fn delete_row(&mut self, index: usize) -> Result<(), ChartError> {
        self.row_checked(index)?;
        self.rows.remove(index);
        self.renumber();
        log::info!("Deleted row {}; {} rows remain", index + 1, self.rows.len());
        self.recompute_shape();
        Ok(())
    }

    /// Slice or pad every row to `width` and the row list to `height`.
    /// The new width becomes the cast-on count. Content past the new right
    /// edge is lost (cables cut by the edge are dissolved).
    pub fn resize_grid(&mut self, width: usize, height: usize) {
        for row in &mut self.rows {
            row.cells.resize(width, StitchCell::empty());
            dissolve_cut_cables(&mut row.cells);
            row.expected_stitch_count = width;
        }

        self.rows.truncate(height);
        while self.rows.len() < height {
            let index = self.rows.len();
            self.rows.push(Row::new(index + 1, width, self.structure.side_for_row(index)));
        }

        self.cast_on_count = width;
        self.renumber();
        log::info!("Resized chart to {} x {}", width, height);
        self.recompute_shape();
    }

    /// Change flat/circular structure and re-derive every row's side
    pub fn set_structure(&mut self, structure: ChartStructure) {
        self.structure = structure;
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.is_right_side = structure.side_for_row(index);
        }
    }

    // ========================================================================
    // Text replay
    // ========================================================================

    /// Replace a row's content with a parsed stitch sequence.
    ///
    /// The row is cleared, `raw_text` is stored as its instruction, and the
    /// stitches are placed left to right, advancing by each stitch's span.
    /// Placements the shape rejects are skipped and reported; replay stops
    /// once the cursor passes the row width.
    pub fn apply_row_from_sequence(
        &mut self,
        row: usize,
        stitches: &[ParsedStitch],
        raw_text: &str,
    ) -> Result<ApplyReport, ChartError> {
        self.row_checked(row)?;

        self.rows[row].clear_real_cells();
        self.rows[row].text_instruction = Some(raw_text.to_string());
        self.recompute_shape();

        let mut report = self.replay(row, stitches);

        let covered: usize = stitches.iter().map(|s| s.kind.span()).sum();
        let target = &self.rows[row];
        if covered != target.expected_stitch_count {
            report.warnings.push(ParseWarning::stitch_count_mismatch(
                target.row_number,
                target.expected_stitch_count,
                covered,
            ));
        }

        log::info!(
            "Applied {} stitches to row {} ({} skipped, {} truncated)",
            report.placed,
            row + 1,
            report.skipped.len(),
            report.truncated
        );
        Ok(report)
    }

    /// Written instructions for every row, bottom to top
    pub fn rows_to_text(&self, compress: bool) -> Vec<SerializedRow> {
        self.rows.iter().map(|row| self.serialize(row, compress)).collect()
    }

    /// Written instruction for one row, read on that row's side
    pub fn row_to_text(&self, row: usize, compress: bool) -> Result<SerializedRow, ChartError> {
        let target = self.row_checked(row)?;
        Ok(self.serialize(target, compress))
    }

    /// Serialize with colors missing from the palette written as no color
    fn serialize(&self, row: &Row, compress: bool) -> SerializedRow {
        let cells: Vec<StitchCell> = row
            .cells
            .iter()
            .map(|cell| {
                let mut cell = cell.clone();
                if self.palette.lookup(cell.color_id.as_deref()).is_none() {
                    cell.color_id = None;
                }
                cell
            })
            .collect();
        serialize_row(&cells, row.is_right_side, compress)
    }

    fn replay(&mut self, row: usize, stitches: &[ParsedStitch]) -> ApplyReport {
        let mut report = ApplyReport::default();
        let mut col = 0;

        for (index, stitch) in stitches.iter().enumerate() {
            if col >= self.rows[row].width() {
                report.truncated = stitches.len() - index;
                break;
            }
            match self.place_stitch(row, col, stitch.kind, stitch.color_id.as_deref()) {
                Ok(()) => report.placed += 1,
                Err(e) => report.skipped.push(SkippedPlacement {
                    index,
                    column: col,
                    reason: e.to_string(),
                }),
            }
            col += stitch.kind.span();
        }

        report
    }

    // ========================================================================
    // Shape
    // ========================================================================

    /// Rederive every row's expected count and reconcile the grid against it
    pub fn recompute_shape(&mut self) {
        shape::recompute(&mut self.rows, self.cast_on_count);
    }

    fn renumber(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.row_number = index + 1;
        }
    }

    fn row_checked(&self, index: usize) -> Result<&Row, ChartError> {
        self.rows.get(index).ok_or(ChartError::RowOutOfRange {
            index,
            len: self.rows.len(),
        })
    }
}

/// Origin column and span of the cable unit covering `col`, if any
pub fn cable_unit(cells: &[StitchCell], col: usize) -> Option<(usize, usize)> {
    let cell = cells.get(col)?;
    let origin = if cell.kind.is_cable() {
        col
    } else if cell.is_cable_continuation {
        cell.cable_origin?
    } else {
        return None;
    };
    let origin_cell = cells.get(origin).filter(|c| c.kind.is_cable())?;
    Some((origin, origin_cell.kind.span()))
}

/// Reset to placeholders every cable unit touching `start..end`
fn dissolve_cables(cells: &mut [StitchCell], start: usize, end: usize) {
    for col in start..end.min(cells.len()) {
        match cable_unit(cells, col) {
            Some((origin, span)) => {
                let unit_end = (origin + span).min(cells.len());
                for c in origin..unit_end {
                    if c == origin || cells[c].cable_origin == Some(origin) {
                        cells[c] = StitchCell::empty();
                    }
                }
            }
            // stale continuation whose origin is gone
            None if cells[col].is_cable_continuation => cells[col] = StitchCell::empty(),
            None => {}
        }
    }
}

/// Dissolve cables whose span runs past the end of the row
fn dissolve_cut_cables(cells: &mut [StitchCell]) {
    let len = cells.len();
    for col in 0..len {
        if cells[col].kind.is_cable() && col + cells[col].kind.span() > len {
            dissolve_cables(cells, col, col + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StructureKind;

    fn chart(width: usize, height: usize) -> Chart {
        Chart::new(&ChartConfig {
            cast_on_count: width,
            row_count: height,
            ..ChartConfig::default()
        })
    }

    #[test]
    fn test_new_chart_alternates_sides() {
        let c = chart(4, 3);
        assert_eq!(c.width(), 4);
        assert!(c.rows()[0].is_right_side);
        assert!(!c.rows()[1].is_right_side);
        assert_eq!(c.rows()[2].row_number, 3);
    }

    #[test]
    fn test_sentinel_placement_rejected() {
        let mut c = chart(4, 1);
        assert_eq!(
            c.place_stitch(0, 0, StitchKind::NoStitch, None),
            Err(ShapeError::SentinelKind { stitch: StitchKind::NoStitch })
        );
    }

    #[test]
    fn test_placing_over_continuation_dissolves_cable() {
        let mut c = chart(6, 1);
        c.place_stitch(0, 0, StitchKind::Cable4Front, None).unwrap();
        c.place_stitch(0, 2, StitchKind::Purl, None).unwrap();

        let cells = &c.rows()[0].cells;
        assert_eq!(cells[0].kind, StitchKind::Empty);
        assert!(!cells[1].is_cable_continuation);
        assert_eq!(cells[2].kind, StitchKind::Purl);
        assert!(!cells[3].is_cable_continuation);
    }

    #[test]
    fn test_resize_dissolves_cut_cable() {
        let mut c = chart(6, 2);
        c.place_stitch(0, 2, StitchKind::Cable4Back, None).unwrap();
        c.resize_grid(4, 2);

        assert_eq!(c.width(), 4);
        assert!(c.rows()[0].cells.iter().all(StitchCell::is_placeholder));
        assert_eq!(c.cast_on_count(), 4);
    }

    #[test]
    fn test_resize_adds_rows_and_renumbers() {
        let mut c = chart(4, 2);
        c.resize_grid(5, 4);
        assert_eq!(c.height(), 4);
        assert_eq!(c.width(), 5);
        assert_eq!(c.rows()[3].row_number, 4);
        assert!(!c.rows()[3].is_right_side);
    }

    #[test]
    fn test_circular_rows_are_all_right_side() {
        let mut c = chart(4, 3);
        c.set_structure(ChartStructure { kind: StructureKind::Circular, starts_on_rs: true });
        assert!(c.rows().iter().all(|r| r.is_right_side));
        c.add_row(None);
        assert!(c.rows()[3].is_right_side);
    }

    #[test]
    fn test_fill_row_tiles_cables() {
        let mut c = chart(10, 1);
        let report = c.fill_row(0, StitchKind::Cable4Front, Some("MC")).unwrap();
        assert_eq!(report.placed, 2);
        let cells = &c.rows()[0].cells;
        assert_eq!(cells[4].kind, StitchKind::Cable4Front);
        assert!(cells[8].is_placeholder());
        assert_eq!(cells[5].color_id.as_deref(), Some("MC"));
    }

    #[test]
    fn test_delete_row_out_of_range() {
        let mut c = chart(4, 2);
        assert!(matches!(c.delete_row(5), Err(ChartError::RowOutOfRange { index: 5, len: 2 })));
    }

    #[test]
    fn test_row_text_follows_side() {
        let mut c = chart(4, 2);
        c.place_stitch(0, 0, StitchKind::YarnOver, None).unwrap();
        c.place_stitch(1, 0, StitchKind::Purl, None).unwrap();

        // row 1 is right side (read from the right), row 2 wrong side
        assert_eq!(c.row_to_text(0, false).unwrap().text, "yo");
        let texts = c.rows_to_text(false);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[1].text, "p");
        assert!(!texts[0].has_gaps);
        assert!(c.row_to_text(9, false).is_err());
    }

    #[test]
    fn test_removed_color_serializes_as_no_color() {
        let mut c = chart(3, 1);
        c.place_stitch(0, 0, StitchKind::Knit, Some("CC2")).unwrap();
        c.place_stitch(0, 1, StitchKind::Purl, Some("MC")).unwrap();
        assert_eq!(c.row_to_text(0, false).unwrap().text, "p MC, k CC2");

        c.remove_color("CC2");
        assert_eq!(c.row_to_text(0, false).unwrap().text, "p MC, k");
        assert_eq!(c.rows_to_text(false)[0].text, "p MC, k");

        // the stored reference is kept
        assert_eq!(c.rows()[0].cells[0].color_id.as_deref(), Some("CC2"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut c = chart(4, 2);
        c.set_name("Scarf");
        c.reset();
        assert_eq!(c.name(), "Untitled Pattern");
        assert_eq!(c.width(), 20);
        assert_eq!(c.height(), 10);
    }
}
