//! Shared types for the WASM API
//!
//! This module contains common result types used across the API session.

use crate::chart::ApplyReport;
use crate::models::{Row, StitchCell};
use crate::parse::ParseResult;

/// Represents a row that was modified during an edit operation
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirtyRow {
    pub row: usize,
    pub row_number: usize,
    pub cells: Vec<StitchCell>,
    pub expected_stitch_count: usize,
    pub warnings: Vec<String>,
}

impl From<(usize, &Row)> for DirtyRow {
    fn from((row, data): (usize, &Row)) -> Self {
        Self {
            row,
            row_number: data.row_number,
            cells: data.cells.clone(),
            expected_stitch_count: data.expected_stitch_count,
            warnings: data.warnings.clone(),
        }
    }
}

/// Result of an edit operation (mutation primitive)
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub dirty_rows: Vec<DirtyRow>,

    /// Rows past this index no longer exist
    pub row_count: usize,
    pub width: usize,
}

impl EditResult {
    /// Diff two row lists; every row that changed or appeared is dirty
    pub fn between(before: &[Row], after: &[Row]) -> Self {
        let dirty_rows = after
            .iter()
            .enumerate()
            .filter(|(index, row)| before.get(*index) != Some(*row))
            .map(DirtyRow::from)
            .collect();

        Self {
            dirty_rows,
            row_count: after.len(),
            width: after.first().map(Row::width).unwrap_or(0),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.dirty_rows.is_empty()
    }
}

/// Result of applying written instructions to a row
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTextResult {
    pub parse: ParseResult,

    /// Present only when the instruction parsed cleanly and was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ApplyReport>,

    pub edit: EditResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StitchKind;

    #[test]
    fn test_between_reports_changed_rows() {
        let before = vec![Row::new(1, 3, true), Row::new(2, 3, false)];
        let mut after = before.clone();
        after[1].cells[0] = StitchCell::new(StitchKind::Purl, None);
        after.push(Row::new(3, 3, true));

        let result = EditResult::between(&before, &after);
        let dirty: Vec<usize> = result.dirty_rows.iter().map(|d| d.row).collect();
        assert_eq!(dirty, vec![1, 2]);
        assert_eq!(result.row_count, 3);
        assert_eq!(result.width, 3);
    }

    #[test]
    fn test_no_change_is_clean() {
        let rows = vec![Row::new(1, 2, true)];
        assert!(EditResult::between(&rows, &rows).is_clean());
    }
}
