//! Chart snapshots
//!
//! The shell saves and restores charts as opaque records. A snapshot holds
//! the rows, palette and structure; restoring renumbers rows and recomputes
//! the shape so a hand-edited or older snapshot still lands in a valid state.

use serde::{Deserialize, Serialize};

use super::{Chart, ChartError};
use crate::models::{ChartStructure, Palette, Row};

/// Snapshot format version
pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    #[serde(default = "default_version")]
    pub version: String,
    pub name: String,
    pub structure: ChartStructure,
    pub cast_on_count: usize,
    pub rows: Vec<Row>,
    #[serde(rename = "colorPalette", default)]
    pub palette: Palette,
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl ChartSnapshot {
    pub fn to_json(&self) -> Result<String, ChartError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Chart {
    /// Capture the full chart state
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            name: self.name.clone(),
            structure: self.structure,
            cast_on_count: self.cast_on_count,
            rows: self.rows.clone(),
            palette: self.palette.clone(),
        }
    }

    /// Build a chart from a snapshot
    pub fn restore(snapshot: ChartSnapshot) -> Self {
        if snapshot.version != SNAPSHOT_VERSION {
            log::warn!("Restoring snapshot version {} (current {})", snapshot.version, SNAPSHOT_VERSION);
        }

        let mut chart = Self {
            name: snapshot.name,
            rows: snapshot.rows,
            cast_on_count: snapshot.cast_on_count,
            structure: snapshot.structure,
            palette: snapshot.palette,
        };
        chart.renumber();
        chart.recompute_shape();
        log::info!("Restored chart \"{}\" ({} rows)", chart.name, chart.rows.len());
        chart
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        self.snapshot().to_json()
    }

    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        Ok(Self::restore(ChartSnapshot::from_json(json)?))
    }
}
