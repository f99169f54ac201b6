//! Parse results, errors and warnings
//!
//! Parsing never fails as a whole: problems are collected per token and
//! returned alongside whatever stitches could be read.

use serde::{Deserialize, Serialize};

use crate::models::ParsedStitch;

/// Upper bound on the stitches one instruction may expand to
pub const MAX_EXPANDED_STITCHES: usize = 10_000;

/// Hard parse failures
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ParseErrorKind {
    UnknownStitch,
    UnbalancedMarkers,
    MissingRepeatCount,
    InvalidRepeatSuffixOnBasicStitch,
    TooManyStitches,
    EmptyInput,
}

/// A token that could not be read
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,

    /// Offending token text, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Index of the offending token in the delimiter split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            token: None,
            position: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position.get_or_insert(position);
        self
    }

    pub fn unknown_stitch(abbreviation: &str) -> Self {
        Self::new(
            ParseErrorKind::UnknownStitch,
            format!("Unknown stitch abbreviation: \"{}\"", abbreviation),
        )
        .with_token(abbreviation)
    }

    pub fn too_many_stitches(token: &str) -> Self {
        Self::new(
            ParseErrorKind::TooManyStitches,
            format!(
                "\"{}\" expands to more than {} stitches",
                token, MAX_EXPANDED_STITCHES
            ),
        )
        .with_token(token)
    }

    pub fn empty_input() -> Self {
        Self::new(ParseErrorKind::EmptyInput, "Please enter a text instruction")
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Non-fatal findings
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ParseWarningKind {
    UnknownColor,
    StitchCountMismatch,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub kind: ParseWarningKind,
    pub message: String,
}

impl ParseWarning {
    pub fn unknown_color(code: &str) -> Self {
        Self {
            kind: ParseWarningKind::UnknownColor,
            message: format!("Unknown color \"{}\". Using default (no color).", code),
        }
    }

    pub fn stitch_count_mismatch(row_number: usize, expected: usize, found: usize) -> Self {
        Self {
            kind: ParseWarningKind::StitchCountMismatch,
            message: format!(
                "Row {} expects {} stitches but the instruction covers {}",
                row_number, expected, found
            ),
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of parsing one instruction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// True iff no errors were collected
    pub success: bool,

    /// Expanded stitch sequence in reading order
    pub stitches: Vec<ParsedStitch>,

    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,

    /// Length of `stitches`
    pub total_stitch_count: usize,
}

impl ParseResult {
    pub(crate) fn finish(
        stitches: Vec<ParsedStitch>,
        errors: Vec<ParseError>,
        warnings: Vec<ParseWarning>,
    ) -> Self {
        Self {
            success: errors.is_empty(),
            total_stitch_count: stitches.len(),
            stitches,
            errors,
            warnings,
        }
    }

    /// Kinds of all collected errors, in order
    pub fn error_kinds(&self) -> Vec<ParseErrorKind> {
        self.errors.iter().map(|e| e.kind).collect()
    }
}
