//! Stitch kinds and enumerations for knitting charts
//!
//! This module defines the closed set of stitch operations a chart cell can
//! hold, the two sentinel kinds used for shaping, and the small enums shared
//! by the parser and the chart structure.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Error raised when an abbreviation does not name a known stitch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StitchError {
    #[error("Unknown stitch kind: \"{0}\"")]
    UnknownStitchKind(String),
}

/// Every operation a chart cell can hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum StitchKind {
    /// Unfilled but real cell (placeholder)
    #[default]
    Empty,

    /// Fabric that does not exist at this position because of shaping
    NoStitch,

    // Basic
    Knit,
    Purl,
    Slip,
    SlipOne,

    // Increases
    YarnOver,
    MakeOne,
    MakeOneLeft,
    MakeOneRight,
    MakeOnePurl,
    KnitFrontBack,
    PurlFrontBack,

    // Decreases
    KnitTwoTogether,
    PurlTwoTogether,
    SlipSlipKnit,
    SlipSlipPurl,
    KnitThreeTogether,
    PurlThreeTogether,
    SlipSlipSlipKnit,
    CentralDoubleDecrease,
    SlipKnitTwoPass,

    // Cables
    Cable2Front,
    Cable2Back,
    Cable3Front,
    Cable3Back,
    Cable4Front,
    Cable4Back,
    Cable6Front,
    Cable6Back,
    Cable8Front,
    Cable8Back,
}

/// Palette grouping used by the stitch picker
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StitchCategory {
    Basic,
    Increase,
    Decrease,
    Cable,
    Placeholder,
}

const ALL_STITCHES: [StitchKind; 30] = [
    StitchKind::Knit,
    StitchKind::Purl,
    StitchKind::Slip,
    StitchKind::SlipOne,
    StitchKind::YarnOver,
    StitchKind::MakeOne,
    StitchKind::MakeOneLeft,
    StitchKind::MakeOneRight,
    StitchKind::MakeOnePurl,
    StitchKind::KnitFrontBack,
    StitchKind::PurlFrontBack,
    StitchKind::KnitTwoTogether,
    StitchKind::PurlTwoTogether,
    StitchKind::SlipSlipKnit,
    StitchKind::SlipSlipPurl,
    StitchKind::KnitThreeTogether,
    StitchKind::PurlThreeTogether,
    StitchKind::SlipSlipSlipKnit,
    StitchKind::CentralDoubleDecrease,
    StitchKind::SlipKnitTwoPass,
    StitchKind::Cable2Front,
    StitchKind::Cable2Back,
    StitchKind::Cable3Front,
    StitchKind::Cable3Back,
    StitchKind::Cable4Front,
    StitchKind::Cable4Back,
    StitchKind::Cable6Front,
    StitchKind::Cable6Back,
    StitchKind::Cable8Front,
    StitchKind::Cable8Back,
];

impl StitchKind {
    /// All non-sentinel stitch kinds, in picker order
    pub fn all() -> &'static [StitchKind] {
        &ALL_STITCHES
    }

    /// Look up a stitch by its written abbreviation (case-insensitive)
    ///
    /// Sentinels are not writable in notation and never match.
    pub fn from_abbreviation(s: &str) -> Result<Self, StitchError> {
        let lower = s.trim().to_ascii_lowercase();
        ALL_STITCHES
            .iter()
            .copied()
            .find(|kind| kind.abbreviation() == lower)
            .ok_or(StitchError::UnknownStitchKind(lower))
    }

    /// Written abbreviation; sentinels use their storage names
    pub fn abbreviation(&self) -> &'static str {
        match self {
            StitchKind::Empty => "",
            StitchKind::NoStitch => "no-stitch",
            StitchKind::Knit => "k",
            StitchKind::Purl => "p",
            StitchKind::Slip => "sl",
            StitchKind::SlipOne => "sl1",
            StitchKind::YarnOver => "yo",
            StitchKind::MakeOne => "m1",
            StitchKind::MakeOneLeft => "m1l",
            StitchKind::MakeOneRight => "m1r",
            StitchKind::MakeOnePurl => "m1p",
            StitchKind::KnitFrontBack => "kfb",
            StitchKind::PurlFrontBack => "pfb",
            StitchKind::KnitTwoTogether => "k2tog",
            StitchKind::PurlTwoTogether => "p2tog",
            StitchKind::SlipSlipKnit => "ssk",
            StitchKind::SlipSlipPurl => "ssp",
            StitchKind::KnitThreeTogether => "k3tog",
            StitchKind::PurlThreeTogether => "p3tog",
            StitchKind::SlipSlipSlipKnit => "sssk",
            StitchKind::CentralDoubleDecrease => "cdd",
            StitchKind::SlipKnitTwoPass => "sk2p",
            StitchKind::Cable2Front => "c2f",
            StitchKind::Cable2Back => "c2b",
            StitchKind::Cable3Front => "c3f",
            StitchKind::Cable3Back => "c3b",
            StitchKind::Cable4Front => "c4f",
            StitchKind::Cable4Back => "c4b",
            StitchKind::Cable6Front => "c6f",
            StitchKind::Cable6Back => "c6b",
            StitchKind::Cable8Front => "c8f",
            StitchKind::Cable8Back => "c8b",
        }
    }

    /// Get a human-readable name for this stitch
    pub fn full_name(&self) -> &'static str {
        match self {
            StitchKind::Empty => "Empty",
            StitchKind::NoStitch => "No Stitch",
            StitchKind::Knit => "Knit",
            StitchKind::Purl => "Purl",
            StitchKind::Slip => "Slip",
            StitchKind::SlipOne => "Slip One",
            StitchKind::YarnOver => "Yarn Over",
            StitchKind::MakeOne => "Make One",
            StitchKind::MakeOneLeft => "Make One Left",
            StitchKind::MakeOneRight => "Make One Right",
            StitchKind::MakeOnePurl => "Make One Purl",
            StitchKind::KnitFrontBack => "Knit Front and Back",
            StitchKind::PurlFrontBack => "Purl Front and Back",
            StitchKind::KnitTwoTogether => "Knit Two Together",
            StitchKind::PurlTwoTogether => "Purl Two Together",
            StitchKind::SlipSlipKnit => "Slip Slip Knit",
            StitchKind::SlipSlipPurl => "Slip Slip Purl",
            StitchKind::KnitThreeTogether => "Knit Three Together",
            StitchKind::PurlThreeTogether => "Purl Three Together",
            StitchKind::SlipSlipSlipKnit => "Slip Slip Slip Knit",
            StitchKind::CentralDoubleDecrease => "Central Double Decrease",
            StitchKind::SlipKnitTwoPass => "Slip Knit Two Pass",
            StitchKind::Cable2Front => "Cable 2 Front",
            StitchKind::Cable2Back => "Cable 2 Back",
            StitchKind::Cable3Front => "Cable 3 Front",
            StitchKind::Cable3Back => "Cable 3 Back",
            StitchKind::Cable4Front => "Cable 4 Front",
            StitchKind::Cable4Back => "Cable 4 Back",
            StitchKind::Cable6Front => "Cable 6 Front",
            StitchKind::Cable6Back => "Cable 6 Back",
            StitchKind::Cable8Front => "Cable 8 Front",
            StitchKind::Cable8Back => "Cable 8 Back",
        }
    }

    /// Short description shown in the stitch picker
    pub fn description(&self) -> &'static str {
        match self {
            StitchKind::Empty => "Unfilled cell",
            StitchKind::NoStitch => "Cell outside the knitted shape",
            StitchKind::Knit => "Standard knit stitch",
            StitchKind::Purl => "Standard purl stitch",
            StitchKind::Slip | StitchKind::SlipOne => "Slip stitch without working",
            StitchKind::YarnOver => "Creates a hole/eyelet increase",
            StitchKind::MakeOne => "Increase between stitches",
            StitchKind::MakeOneLeft => "Left-leaning increase between stitches",
            StitchKind::MakeOneRight => "Right-leaning increase between stitches",
            StitchKind::MakeOnePurl => "Purl increase between stitches",
            StitchKind::KnitFrontBack => "Increase by knitting twice into one stitch",
            StitchKind::PurlFrontBack => "Increase by purling twice into one stitch",
            StitchKind::KnitTwoTogether => "Right-leaning decrease",
            StitchKind::PurlTwoTogether => "Purl decrease",
            StitchKind::SlipSlipKnit => "Left-leaning decrease",
            StitchKind::SlipSlipPurl => "Left-leaning purl decrease",
            StitchKind::KnitThreeTogether | StitchKind::PurlThreeTogether => "Double decrease",
            StitchKind::SlipSlipSlipKnit => "Left-leaning double decrease",
            StitchKind::CentralDoubleDecrease => "Centered double decrease",
            StitchKind::SlipKnitTwoPass => "Left-leaning double decrease",
            StitchKind::Cable2Front
            | StitchKind::Cable3Front
            | StitchKind::Cable4Front
            | StitchKind::Cable6Front
            | StitchKind::Cable8Front => "Cross stitches with cable needle in front",
            StitchKind::Cable2Back
            | StitchKind::Cable3Back
            | StitchKind::Cable4Back
            | StitchKind::Cable6Back
            | StitchKind::Cable8Back => "Cross stitches with cable needle in back",
        }
    }

    pub fn category(&self) -> StitchCategory {
        match self {
            StitchKind::Empty | StitchKind::NoStitch => StitchCategory::Placeholder,
            StitchKind::Knit | StitchKind::Purl | StitchKind::Slip | StitchKind::SlipOne => {
                StitchCategory::Basic
            }
            StitchKind::YarnOver
            | StitchKind::MakeOne
            | StitchKind::MakeOneLeft
            | StitchKind::MakeOneRight
            | StitchKind::MakeOnePurl
            | StitchKind::KnitFrontBack
            | StitchKind::PurlFrontBack => StitchCategory::Increase,
            StitchKind::KnitTwoTogether
            | StitchKind::PurlTwoTogether
            | StitchKind::SlipSlipKnit
            | StitchKind::SlipSlipPurl
            | StitchKind::KnitThreeTogether
            | StitchKind::PurlThreeTogether
            | StitchKind::SlipSlipSlipKnit
            | StitchKind::CentralDoubleDecrease
            | StitchKind::SlipKnitTwoPass => StitchCategory::Decrease,
            _ => StitchCategory::Cable,
        }
    }

    /// Check if this is one of the two sentinel kinds
    pub fn is_sentinel(&self) -> bool {
        matches!(self, StitchKind::Empty | StitchKind::NoStitch)
    }

    pub fn is_cable(&self) -> bool {
        self.category() == StitchCategory::Cable
    }

    /// Knit and purl are written with fused counts only ("k2", never "k twice")
    pub fn is_basic_knit_or_purl(&self) -> bool {
        matches!(self, StitchKind::Knit | StitchKind::Purl)
    }
}

impl std::fmt::Display for StitchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}

// Stored as the abbreviation string
impl Serialize for StitchKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.abbreviation())
    }
}

// Unknown names load as an empty placeholder rather than failing the whole chart
impl<'de> Deserialize<'de> for StitchKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct StitchKindVisitor;

        impl<'de> serde::de::Visitor<'de> for StitchKindVisitor {
            type Value = StitchKind;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a stitch abbreviation string")
            }

            fn visit_str<E>(self, value: &str) -> Result<StitchKind, E>
            where
                E: serde::de::Error,
            {
                Ok(match value {
                    "" => StitchKind::Empty,
                    "no-stitch" => StitchKind::NoStitch,
                    other => StitchKind::from_abbreviation(other).unwrap_or_else(|e| {
                        log::warn!("{}; loading cell as empty placeholder", e);
                        StitchKind::Empty
                    }),
                })
            }

            fn visit_unit<E>(self) -> Result<StitchKind, E>
            where
                E: serde::de::Error,
            {
                Ok(StitchKind::Empty)
            }
        }

        deserializer.deserialize_any(StitchKindVisitor)
    }
}

/// Token delimiter used in written instructions
#[wasm_bindgen]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde_repr::Serialize_repr, serde_repr::Deserialize_repr)]
pub enum Delimiter {
    Comma = 0,
    Period = 1,
    Pipe = 2,
}

impl Delimiter {
    /// Order in which delimiters are attempted when the caller has no hint
    pub const ATTEMPT_ORDER: [Delimiter; 3] = [Delimiter::Comma, Delimiter::Period, Delimiter::Pipe];

    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Period => '.',
            Delimiter::Pipe => '|',
        }
    }

    /// Convert the numeric code used across the JS boundary
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Delimiter::Comma),
            1 => Some(Delimiter::Period),
            2 => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Comma
    }
}
