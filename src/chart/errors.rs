//! Error types for chart editing
//!
//! Shape errors reject a single placement and leave the chart untouched.
//! Chart errors cover caller-supplied indices and snapshot decoding.

use serde::Serialize;
use thiserror::Error;

use crate::models::StitchKind;

/// A placement the knitted shape cannot accept
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShapeError {
    /// Target cell is outside the chart or outside the knitted shape
    #[error("Cell ({row}, {col}) does not exist in the knitted shape")]
    OutOfShape { row: usize, col: usize },

    /// Not enough real cells to the right of the target for the cable span
    #[error("{stitch} needs {needed} cells at column {col} but only {available} are available")]
    CableOverflow {
        stitch: StitchKind,
        col: usize,
        needed: usize,
        available: usize,
    },

    /// Sentinel kinds are maintained by the shape engine, not placed
    #[error("\"{stitch}\" cannot be placed directly")]
    SentinelKind { stitch: StitchKind },
}

/// Errors from chart-level operations
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Row index {index} out of range (chart has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
