//! WASM API for the chart editing session
//!
//! `KnitChartEditor` owns one `Chart` and exposes the editing operations to
//! JavaScript. Every mutating call returns an `EditResult` listing the rows
//! that changed, which the presentation layer uses to redraw.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{
    delimiter_from_u8, deserialize, deserialize_optional, error_value, serialize,
    stitch_from_js, validate_index, validation_error,
};
use crate::api::types::{ApplyTextResult, EditResult};
use crate::chart::{Chart, ChartError};
use crate::models::{
    ChartConfig, ChartStructure, ColorDefinition, Palette, ParsedStitch, StitchCell, EditorSettings,
};
use crate::parse::parse_instruction;
use crate::renderers::serialize_row;
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

/// One editing session over a single chart
#[wasm_bindgen]
pub struct KnitChartEditor {
    chart: Chart,
    settings: EditorSettings,
}

impl KnitChartEditor {
    /// Run a mutation and report which rows it touched
    fn edit<F>(&mut self, op: F) -> EditResult
    where
        F: FnOnce(&mut Chart),
    {
        let before = self.chart.rows().to_vec();
        op(&mut self.chart);
        let result = EditResult::between(&before, self.chart.rows());
        wasm_log!("  {} dirty row(s)", result.dirty_rows.len());
        result
    }

    fn try_edit<F, E>(&mut self, op: F) -> Result<EditResult, E>
    where
        F: FnOnce(&mut Chart) -> Result<(), E>,
    {
        let before = self.chart.rows().to_vec();
        op(&mut self.chart)?;
        Ok(EditResult::between(&before, self.chart.rows()))
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }
}

#[wasm_bindgen]
impl KnitChartEditor {
    /// Create a session. `config_js` may be omitted for a default 20 x 10 chart.
    #[wasm_bindgen(constructor)]
    pub fn new(config_js: JsValue) -> Result<KnitChartEditor, JsValue> {
        let config: ChartConfig =
            deserialize_optional(config_js, "Chart config deserialization error")?.unwrap_or_default();
        wasm_info!(
            "KnitChartEditor created: {} x {} \"{}\"",
            config.cast_on_count,
            config.row_count,
            config.name
        );

        Ok(Self {
            chart: Chart::new(&config),
            settings: EditorSettings::default(),
        })
    }

    // ========================================================================
    // Cell edits
    // ========================================================================

    /// Place a stitch; throws a `ShapeError` object when the shape rejects it
    #[wasm_bindgen(js_name = placeStitch)]
    pub fn place_stitch(
        &mut self,
        row: usize,
        col: usize,
        abbreviation: &str,
        color_id: Option<String>,
    ) -> Result<JsValue, JsValue> {
        wasm_info!("placeStitch called: ({}, {}) '{}' color={:?}", row, col, abbreviation, color_id);

        let kind = stitch_from_js(abbreviation).map_err(validation_error)?;
        let result = self
            .try_edit(|chart| chart.place_stitch(row, col, kind, color_id.as_deref()))
            .map_err(|e| error_value(&e))?;

        serialize(&result, "EditResult serialization error")
    }

    #[wasm_bindgen(js_name = clearCell)]
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        wasm_info!("clearCell called: ({}, {})", row, col);
        let result = self.edit(|chart| chart.clear_cell(row, col));
        serialize(&result, "EditResult serialization error")
    }

    #[wasm_bindgen(js_name = fillRow)]
    pub fn fill_row(
        &mut self,
        row: usize,
        abbreviation: &str,
        color_id: Option<String>,
    ) -> Result<JsValue, JsValue> {
        wasm_info!("fillRow called: row={} '{}'", row, abbreviation);

        let kind = stitch_from_js(abbreviation).map_err(validation_error)?;
        let mut report = None;
        let result = self
            .try_edit(|chart| {
                report = Some(chart.fill_row(row, kind, color_id.as_deref())?);
                Ok::<(), ChartError>(())
            })
            .map_err(|e| validation_error(e.to_string()))?;

        if let Some(report) = report.filter(|r| !r.skipped.is_empty()) {
            wasm_warn!("fillRow skipped {} placement(s)", report.skipped.len());
        }
        serialize(&result, "EditResult serialization error")
    }

    // ========================================================================
    // Rows and grid
    // ========================================================================

    #[wasm_bindgen(js_name = addRow)]
    pub fn add_row(&mut self, is_right_side: Option<bool>) -> Result<JsValue, JsValue> {
        wasm_info!("addRow called: side={:?}", is_right_side);
        let result = self.edit(|chart| chart.add_row(is_right_side));
        serialize(&result, "EditResult serialization error")
    }

    #[wasm_bindgen(js_name = deleteRow)]
    pub fn delete_row(&mut self, index: usize) -> Result<JsValue, JsValue> {
        wasm_info!("deleteRow called: index={}", index);
        validate_index(index, self.chart.height(), "Row").map_err(validation_error)?;

        let result = self
            .try_edit(|chart| chart.delete_row(index))
            .map_err(|e| validation_error(e.to_string()))?;
        serialize(&result, "EditResult serialization error")
    }

    #[wasm_bindgen(js_name = resizeGrid)]
    pub fn resize_grid(&mut self, width: usize, height: usize) -> Result<JsValue, JsValue> {
        wasm_info!("resizeGrid called: {} x {}", width, height);
        let result = self.edit(|chart| chart.resize_grid(width, height));
        serialize(&result, "EditResult serialization error")
    }

    #[wasm_bindgen(js_name = setStructure)]
    pub fn set_structure(&mut self, structure_js: JsValue) -> Result<JsValue, JsValue> {
        let structure: ChartStructure = deserialize(structure_js, "Structure deserialization error")?;
        wasm_info!("setStructure called: {:?}", structure);
        let result = self.edit(|chart| chart.set_structure(structure));
        serialize(&result, "EditResult serialization error")
    }

    /// Recompute the shape explicitly (edits already do this)
    #[wasm_bindgen(js_name = recomputeShape)]
    pub fn recompute_shape(&mut self) -> Result<JsValue, JsValue> {
        let result = self.edit(Chart::recompute_shape);
        serialize(&result, "EditResult serialization error")
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        wasm_info!("reset called");
        let result = self.edit(Chart::reset);
        serialize(&result, "EditResult serialization error")
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Parse an instruction against this chart's palette
    #[wasm_bindgen(js_name = parseInstruction)]
    pub fn parse_instruction(&self, text: &str, delimiter: Option<u8>) -> Result<JsValue, JsValue> {
        let hint = delimiter_from_u8(delimiter)
            .map_err(validation_error)?
            .or(self.settings.default_delimiter);
        let result = parse_instruction(text, hint, self.chart.palette());
        wasm_log!("parseInstruction: {} stitches, {} errors", result.total_stitch_count, result.errors.len());
        serialize(&result, "ParseResult serialization error")
    }

    /// Parse an instruction and, if it parsed cleanly, replay it into `row`
    #[wasm_bindgen(js_name = applyRowText)]
    pub fn apply_row_text(
        &mut self,
        row: usize,
        text: &str,
        delimiter: Option<u8>,
    ) -> Result<JsValue, JsValue> {
        wasm_info!("applyRowText called: row={} text='{}'", row, text);
        validate_index(row, self.chart.height(), "Row").map_err(validation_error)?;

        let hint = delimiter_from_u8(delimiter)
            .map_err(validation_error)?
            .or(self.settings.default_delimiter);
        let parse = parse_instruction(text, hint, self.chart.palette());

        if !parse.success || parse.stitches.is_empty() {
            wasm_warn!("applyRowText: instruction not applied ({} errors)", parse.errors.len());
            let result = ApplyTextResult {
                parse,
                report: None,
                edit: EditResult::default(),
            };
            return serialize(&result, "ApplyTextResult serialization error");
        }

        let stitches = parse.stitches.clone();
        let mut report = None;
        let edit = self
            .try_edit(|chart| {
                report = Some(chart.apply_row_from_sequence(row, &stitches, text)?);
                Ok::<(), ChartError>(())
            })
            .map_err(|e| validation_error(e.to_string()))?;

        let result = ApplyTextResult { parse, report, edit };
        serialize(&result, "ApplyTextResult serialization error")
    }

    /// Replay an already parsed stitch sequence into `row`
    #[wasm_bindgen(js_name = applyRowFromSequence)]
    pub fn apply_row_from_sequence(
        &mut self,
        row: usize,
        stitches_js: JsValue,
        raw_text: &str,
    ) -> Result<JsValue, JsValue> {
        let stitches: Vec<ParsedStitch> = deserialize(stitches_js, "Stitch sequence deserialization error")?;
        wasm_info!("applyRowFromSequence called: row={} ({} stitches)", row, stitches.len());

        let mut report = None;
        let edit = self
            .try_edit(|chart| {
                report = Some(chart.apply_row_from_sequence(row, &stitches, raw_text)?);
                Ok::<(), ChartError>(())
            })
            .map_err(|e| validation_error(e.to_string()))?;

        serialize(&(edit, report), "EditResult serialization error")
    }

    /// Written instruction for one row
    #[wasm_bindgen(js_name = serializeRow)]
    pub fn serialize_row(&self, row: usize, compress: Option<bool>) -> Result<JsValue, JsValue> {
        let compress = compress.unwrap_or(self.settings.abbreviate_repeats);
        let text = self
            .chart
            .row_to_text(row, compress)
            .map_err(|e| validation_error(e.to_string()))?;
        serialize(&text, "SerializedRow serialization error")
    }

    /// Written instructions for every row
    #[wasm_bindgen(js_name = rowsToText)]
    pub fn rows_to_text(&self, compress: Option<bool>) -> Result<JsValue, JsValue> {
        let compress = compress.unwrap_or(self.settings.abbreviate_repeats);
        serialize(&self.chart.rows_to_text(compress), "SerializedRow serialization error")
    }

    // ========================================================================
    // Palette, settings and metadata
    // ========================================================================

    #[wasm_bindgen(js_name = addColor)]
    pub fn add_color(&mut self, color_js: JsValue) -> Result<bool, JsValue> {
        let color: ColorDefinition = deserialize(color_js, "Color deserialization error")?;
        wasm_info!("addColor called: {}", color.id);
        Ok(self.chart.add_color(color))
    }

    #[wasm_bindgen(js_name = removeColor)]
    pub fn remove_color(&mut self, id: &str) -> bool {
        wasm_info!("removeColor called: {}", id);
        self.chart.remove_color(id).is_some()
    }

    #[wasm_bindgen(js_name = getPalette)]
    pub fn palette(&self) -> Result<JsValue, JsValue> {
        serialize(self.chart.palette(), "Palette serialization error")
    }

    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, settings_js: JsValue) -> Result<(), JsValue> {
        self.settings = deserialize(settings_js, "Settings deserialization error")?;
        wasm_info!("setSettings called: {:?}", self.settings);
        Ok(())
    }

    #[wasm_bindgen(js_name = getSettings)]
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        serialize(&self.settings, "Settings serialization error")
    }

    #[wasm_bindgen(js_name = setName)]
    pub fn set_name(&mut self, name: &str) {
        self.chart.set_name(name);
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.chart.name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> usize {
        self.chart.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> usize {
        self.chart.height()
    }

    #[wasm_bindgen(getter = castOnCount)]
    pub fn cast_on_count(&self) -> usize {
        self.chart.cast_on_count()
    }

    #[wasm_bindgen(js_name = getRows)]
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        serialize(&self.chart.rows(), "Rows serialization error")
    }

    #[wasm_bindgen(js_name = getRow)]
    pub fn row(&self, index: usize) -> Result<JsValue, JsValue> {
        validate_index(index, self.chart.height(), "Row").map_err(validation_error)?;
        serialize(&self.chart.rows()[index], "Row serialization error")
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Full chart state as JSON
    #[wasm_bindgen(js_name = exportSnapshot)]
    pub fn export_snapshot(&self) -> Result<String, JsValue> {
        wasm_info!("exportSnapshot called");
        self.chart.to_json().map_err(|e| {
            wasm_error!("Snapshot export failed: {}", e);
            JsValue::from_str(&e.to_string())
        })
    }

    /// Replace the chart with a JSON snapshot; all rows come back dirty
    #[wasm_bindgen(js_name = importSnapshot)]
    pub fn import_snapshot(&mut self, json: &str) -> Result<JsValue, JsValue> {
        wasm_info!("importSnapshot called ({} bytes)", json.len());
        let chart = Chart::from_json(json).map_err(|e| {
            wasm_error!("Snapshot import failed: {}", e);
            JsValue::from_str(&e.to_string())
        })?;

        self.chart = chart;
        let result = EditResult::between(&[], self.chart.rows());
        serialize(&result, "EditResult serialization error")
    }
}

// ============================================================================
// Stateless helpers
// ============================================================================

/// Parse an instruction without a session.
/// `palette_js` may be omitted to use the default palette.
#[wasm_bindgen(js_name = parseInstruction)]
pub fn parse_instruction_text(
    text: &str,
    delimiter: Option<u8>,
    palette_js: JsValue,
) -> Result<JsValue, JsValue> {
    let hint = delimiter_from_u8(delimiter).map_err(validation_error)?;
    let palette: Palette =
        deserialize_optional(palette_js, "Palette deserialization error")?.unwrap_or_default();
    serialize(&parse_instruction(text, hint, &palette), "ParseResult serialization error")
}

/// Render cells as a written instruction without a session
#[wasm_bindgen(js_name = serializeRow)]
pub fn serialize_cells(
    cells_js: JsValue,
    is_right_side: bool,
    compress: bool,
) -> Result<JsValue, JsValue> {
    let cells: Vec<StitchCell> = deserialize(cells_js, "Cells deserialization error")?;
    serialize(&serialize_row(&cells, is_right_side, compress), "SerializedRow serialization error")
}

/// Catalog of every placeable stitch for the stitch picker
#[wasm_bindgen(js_name = getStitchCatalog)]
pub fn stitch_catalog() -> Result<JsValue, JsValue> {
    let catalog: Vec<StitchInfo> = crate::models::StitchKind::all()
        .iter()
        .map(|kind| StitchInfo {
            abbreviation: kind.abbreviation(),
            name: kind.full_name(),
            description: kind.description(),
            category: kind.category(),
            consumed: kind.effect().consumed,
            created: kind.effect().created,
            span: kind.span(),
        })
        .collect();
    serialize(&catalog, "Stitch catalog serialization error")
}

#[derive(serde::Serialize)]
struct StitchInfo {
    abbreviation: &'static str,
    name: &'static str,
    description: &'static str,
    category: crate::models::StitchCategory,
    consumed: u32,
    created: u32,
    span: usize,
}
