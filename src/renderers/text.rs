//! Written-instruction renderer
//!
//! Turns a row's cells back into knitter shorthand. The output is always
//! accepted by [`crate::parse::parse_instruction`] with the comma delimiter,
//! and re-parses to the same stitch sequence whether or not repeat
//! compression is enabled.

use serde::{Deserialize, Serialize};

use crate::models::{StitchCell, NO_COLOR};

/// Rendered text for one row
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SerializedRow {
    pub text: String,

    /// An unfilled or missing cell sits between stitched cells
    pub has_gaps: bool,
}

/// Render a row's cells in reading order.
///
/// Right-side rows read right to left, wrong-side rows left to right.
/// Placeholders, `NoStitch` cells and cable continuations produce no text.
pub fn serialize_row(cells: &[StitchCell], is_right_side: bool, compress: bool) -> SerializedRow {
    let has_gaps = detect_gaps(cells);

    let mut sequence: Vec<&StitchCell> = cells
        .iter()
        .filter(|cell| !cell.kind.is_sentinel())
        .collect();
    if is_right_side {
        sequence.reverse();
    }

    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < sequence.len() {
        if compress {
            if let Some((length, count)) = best_repeat(&sequence, pos) {
                let pattern = runs_to_tokens(&sequence[pos..pos + length]).join(", ");
                let token = if count == 2 {
                    format!("({}) twice", pattern)
                } else {
                    format!("({}) x{}", pattern, count)
                };
                tokens.push(token);
                pos += length * count;
                continue;
            }
        }

        let run = run_length(&sequence, pos);
        tokens.push(run_token(sequence[pos], run));
        pos += run;
    }

    SerializedRow {
        text: tokens.join(", "),
        has_gaps,
    }
}

// ============================================================================
// Runs
// ============================================================================

fn same_stitch(a: &StitchCell, b: &StitchCell) -> bool {
    a.kind == b.kind && a.color_id == b.color_id
}

fn run_length(sequence: &[&StitchCell], pos: usize) -> usize {
    sequence[pos..]
        .iter()
        .take_while(|cell| same_stitch(cell, sequence[pos]))
        .count()
}

fn runs_to_tokens(sequence: &[&StitchCell]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < sequence.len() {
        let run = run_length(sequence, pos);
        tokens.push(run_token(sequence[pos], run));
        pos += run;
    }
    tokens
}

/// One run of identical stitches.
///
/// Color goes before any repeat suffix (`ssk MC twice`) so the suffix stays
/// the last word of the token.
fn run_token(cell: &StitchCell, count: usize) -> String {
    let abbr = cell.kind.abbreviation();
    let color = cell
        .color_id
        .as_deref()
        .filter(|id| !id.is_empty() && *id != NO_COLOR);

    let mut token = abbr.to_string();
    let mut suffix = None;

    if count > 1 {
        if count == 2 && !cell.kind.is_basic_knit_or_purl() {
            suffix = Some("twice".to_string());
        } else if abbr.ends_with(|c: char| c.is_ascii_digit()) {
            // "sl12" would read back as twelve slips
            suffix = Some(format!("x{}", count));
        } else {
            token.push_str(&count.to_string());
        }
    }

    if let Some(color) = color {
        token.push(' ');
        token.push_str(color);
    }
    if let Some(suffix) = suffix {
        token.push(' ');
        token.push_str(&suffix);
    }
    token
}

// ============================================================================
// Repeat compression
// ============================================================================

/// Times the pattern `sequence[start..start + length]` repeats back to back
fn repeat_count(sequence: &[&StitchCell], start: usize, length: usize) -> usize {
    let pattern = &sequence[start..start + length];
    sequence[start..]
        .chunks_exact(length)
        .take_while(|chunk| {
            chunk
                .iter()
                .zip(pattern)
                .all(|(a, b)| same_stitch(a, b))
        })
        .count()
}

/// Single repeated k or p stitch: always written with the fused count
fn is_trivial_pattern(pattern: &[&StitchCell]) -> bool {
    let first = pattern[0];
    first.kind.is_basic_knit_or_purl() && pattern.iter().all(|cell| same_stitch(cell, first))
}

/// Pattern (length, repeat count) covering the most stitches from `start`
fn best_repeat(sequence: &[&StitchCell], start: usize) -> Option<(usize, usize)> {
    let remaining = sequence.len() - start;
    let mut best: Option<(usize, usize)> = None;

    for length in 1..=remaining / 2 {
        let count = repeat_count(sequence, start, length);
        if count < 2 || is_trivial_pattern(&sequence[start..start + length]) {
            continue;
        }

        let better = match best {
            None => true,
            Some((best_len, best_count)) => {
                let coverage = length * count;
                let best_coverage = best_len * best_count;
                coverage > best_coverage || (coverage == best_coverage && count > best_count)
            }
        };
        if better {
            best = Some((length, count));
        }
    }
    best
}

/// Empty or missing cell between two stitched cells
fn detect_gaps(cells: &[StitchCell]) -> bool {
    let first = cells.iter().position(StitchCell::is_stitched);
    let last = cells.iter().rposition(StitchCell::is_stitched);
    match (first, last) {
        (Some(first), Some(last)) => cells[first..=last].iter().any(|cell| !cell.is_stitched()),
        _ => false,
    }
}
