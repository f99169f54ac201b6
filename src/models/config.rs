//! Chart configuration
//!
//! Settings the presentation shell supplies when creating a chart, plus the
//! text-view preferences. Both deserialize from JSON with defaults for any
//! missing field.

use serde::{Deserialize, Serialize};

use super::color::Palette;
use super::elements::Delimiter;

/// Flat pieces alternate sides; circular pieces are always worked on the right side
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    #[default]
    Flat,
    Circular,
}

/// How rows map to fabric sides
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartStructure {
    #[serde(rename = "type")]
    pub kind: StructureKind,

    /// Whether row 1 is worked on the right side
    pub starts_on_rs: bool,
}

impl Default for ChartStructure {
    fn default() -> Self {
        Self {
            kind: StructureKind::Flat,
            starts_on_rs: true,
        }
    }
}

impl ChartStructure {
    /// Side of the row at 0-based `index`
    pub fn side_for_row(&self, index: usize) -> bool {
        match self.kind {
            StructureKind::Circular => true,
            StructureKind::Flat => (index % 2 == 0) == self.starts_on_rs,
        }
    }
}

/// Settings for a new chart
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub name: String,
    pub cast_on_count: usize,
    pub row_count: usize,
    pub structure: ChartStructure,
    pub palette: Palette,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Pattern".to_string(),
            cast_on_count: 20,
            row_count: 10,
            structure: ChartStructure::default(),
            palette: Palette::default(),
        }
    }
}

impl ChartConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Text-view preferences
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Compress repeating runs into bracketed repeats when rendering rows
    pub abbreviate_repeats: bool,

    /// Delimiter assumed for typed instructions; `None` tries each in turn
    pub default_delimiter: Option<Delimiter>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            abbreviate_repeats: false,
            default_delimiter: None,
        }
    }
}
