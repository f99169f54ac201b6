//! Core data structures for knitting charts
//!
//! This module defines the cell-based chart representation: one `StitchCell`
//! per grid column, grouped into `Row`s.

use serde::{Deserialize, Serialize};

use super::color::normalize_color_id;
use super::effects::{stitches_consumed, stitches_created};
use super::elements::StitchKind;

/// One grid position in a chart row
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StitchCell {
    /// Stitch operation held by this cell
    #[serde(rename = "type")]
    pub kind: StitchKind,

    /// Weak reference to a palette color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,

    /// Set on the trailing cells of a multi-cell cable
    #[serde(default, rename = "isPartOfCable")]
    pub is_cable_continuation: bool,

    /// Column of the cable origin this continuation belongs to
    #[serde(default, rename = "cableParentIndex", skip_serializing_if = "Option::is_none")]
    pub cable_origin: Option<usize>,
}

impl StitchCell {
    /// Create a cell holding a stitch
    pub fn new(kind: StitchKind, color_id: Option<&str>) -> Self {
        Self {
            kind,
            color_id: normalize_color_id(color_id),
            is_cable_continuation: false,
            cable_origin: None,
        }
    }

    /// Unfilled but real cell
    pub fn empty() -> Self {
        Self::default()
    }

    /// Cell outside the knitted shape
    pub fn no_stitch() -> Self {
        Self {
            kind: StitchKind::NoStitch,
            ..Self::default()
        }
    }

    /// Trailing cell of a cable whose origin sits at `origin`
    pub fn cable_continuation(origin: usize, color_id: Option<&str>) -> Self {
        Self {
            kind: StitchKind::Empty,
            color_id: normalize_color_id(color_id),
            is_cable_continuation: true,
            cable_origin: Some(origin),
        }
    }

    /// Check whether this cell is part of the knitted fabric
    pub fn exists(&self) -> bool {
        self.kind != StitchKind::NoStitch
    }

    /// Real cell with no stitch content (and not part of a cable)
    pub fn is_placeholder(&self) -> bool {
        self.kind == StitchKind::Empty && !self.is_cable_continuation
    }

    /// Cell carries a stitch, either directly or as part of a cable
    pub fn is_stitched(&self) -> bool {
        !self.kind.is_sentinel() || self.is_cable_continuation
    }

    /// Net stitch change this cell contributes to the rows above
    pub fn net_effect(&self) -> i64 {
        self.kind.net_effect()
    }
}

/// One stitch produced by the notation parser.
///
/// Carries no position; the chart assigns columns when the sequence is
/// replayed into a row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStitch {
    #[serde(rename = "type")]
    pub kind: StitchKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
}

impl ParsedStitch {
    pub fn new(kind: StitchKind, color_id: Option<&str>) -> Self {
        Self {
            kind,
            color_id: normalize_color_id(color_id),
        }
    }
}

impl From<&StitchCell> for ParsedStitch {
    fn from(cell: &StitchCell) -> Self {
        Self {
            kind: cell.kind,
            color_id: cell.color_id.clone(),
        }
    }
}

/// A single chart row
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// 1-based position, dense over the chart
    pub row_number: usize,

    /// Cells in column order; length equals the chart width
    #[serde(rename = "stitches")]
    pub cells: Vec<StitchCell>,

    /// Right-side rows read right to left
    pub is_right_side: bool,

    /// Real stitch count this row should have given the rows below
    pub expected_stitch_count: usize,

    /// Free-text instruction last applied to this row
    #[serde(default, rename = "textInstruction", skip_serializing_if = "Option::is_none")]
    pub text_instruction: Option<String>,

    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Row {
    /// Create a row of `width` empty placeholder cells
    pub fn new(row_number: usize, width: usize, is_right_side: bool) -> Self {
        Self {
            row_number,
            cells: vec![StitchCell::empty(); width],
            is_right_side,
            expected_stitch_count: width,
            text_instruction: None,
            warnings: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells that are part of the fabric
    pub fn real_stitch_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.exists()).count()
    }

    /// Stitches taken from the row below
    pub fn consumed(&self) -> u32 {
        stitches_consumed(self.cells.iter().map(|cell| &cell.kind))
    }

    /// Stitches handed to the row above
    pub fn created(&self) -> u32 {
        stitches_created(self.cells.iter().map(|cell| &cell.kind))
    }

    /// Signed change in stitch count this row hands to the rows above
    pub fn net_effect(&self) -> i64 {
        self.cells.iter().map(StitchCell::net_effect).sum()
    }

    /// Index one past the rightmost existing cell
    pub fn shape_extent(&self) -> usize {
        self.cells
            .iter()
            .rposition(StitchCell::exists)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Number of existing cells available from `col` onward without crossing
    /// a non-existent cell
    pub fn contiguous_real_cells_from(&self, col: usize) -> usize {
        self.cells
            .iter()
            .skip(col)
            .take_while(|cell| cell.exists())
            .count()
    }

    /// Reset every existing cell to an empty placeholder
    pub fn clear_real_cells(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.exists()) {
            *cell = StitchCell::empty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_none_is_normalized() {
        let cell = StitchCell::new(StitchKind::Knit, Some("none"));
        assert_eq!(cell.color_id, None);
    }

    #[test]
    fn test_cell_classification() {
        assert!(StitchCell::empty().is_placeholder());
        assert!(!StitchCell::empty().is_stitched());
        assert!(!StitchCell::no_stitch().exists());
        let cont = StitchCell::cable_continuation(0, None);
        assert!(cont.is_stitched());
        assert!(!cont.is_placeholder());
        assert_eq!(cont.kind, StitchKind::Empty);
    }

    #[test]
    fn test_row_accounting() {
        let mut row = Row::new(1, 4, true);
        row.cells[0] = StitchCell::new(StitchKind::YarnOver, None);
        row.cells[1] = StitchCell::new(StitchKind::KnitTwoTogether, None);
        row.cells[3] = StitchCell::no_stitch();

        assert_eq!(row.real_stitch_count(), 3);
        assert_eq!(row.consumed(), 2);
        assert_eq!(row.created(), 2);
        assert_eq!(row.net_effect(), 0);
        assert_eq!(row.shape_extent(), 3);
        assert_eq!(row.contiguous_real_cells_from(1), 2);
    }

    #[test]
    fn test_cell_json_uses_storage_names() {
        let cell = StitchCell::cable_continuation(2, Some("MC"));
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["type"], "");
        assert_eq!(json["isPartOfCable"], true);
        assert_eq!(json["cableParentIndex"], 2);
        assert_eq!(json["colorId"], "MC");
    }
}
