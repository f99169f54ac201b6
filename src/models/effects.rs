//! Stitch effect table
//!
//! For each stitch kind: how many stitches it consumes from the row below,
//! how many it creates for the row above, and how many grid cells it spans.
//! All shape arithmetic in the chart is derived from this table.

use serde::{Deserialize, Serialize};

use super::elements::StitchKind;

/// Count effect of a single stitch
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StitchEffect {
    pub consumed: u32,
    pub created: u32,
    pub span: usize,
}

impl StitchEffect {
    /// Effect of an empty placeholder (and of anything unrecognized)
    pub const PLACEHOLDER: StitchEffect = StitchEffect::new(0, 0, 1);

    const fn new(consumed: u32, created: u32, span: usize) -> Self {
        Self { consumed, created, span }
    }

    /// Signed change in stitch count for the rows above
    pub fn net(&self) -> i64 {
        self.created as i64 - self.consumed as i64
    }
}

impl StitchKind {
    /// Look up the stitch effect for this kind
    pub fn effect(&self) -> StitchEffect {
        match self {
            StitchKind::Empty | StitchKind::NoStitch => StitchEffect::PLACEHOLDER,

            // 1 -> 1
            StitchKind::Knit | StitchKind::Purl | StitchKind::Slip | StitchKind::SlipOne => {
                StitchEffect::new(1, 1, 1)
            }

            // 0 -> 1
            StitchKind::YarnOver
            | StitchKind::MakeOne
            | StitchKind::MakeOneLeft
            | StitchKind::MakeOneRight
            | StitchKind::MakeOnePurl => StitchEffect::new(0, 1, 1),

            // 1 -> 2
            StitchKind::KnitFrontBack | StitchKind::PurlFrontBack => StitchEffect::new(1, 2, 1),

            // 2 -> 1
            StitchKind::KnitTwoTogether
            | StitchKind::PurlTwoTogether
            | StitchKind::SlipSlipKnit
            | StitchKind::SlipSlipPurl => StitchEffect::new(2, 1, 1),

            // 3 -> 1
            StitchKind::KnitThreeTogether
            | StitchKind::PurlThreeTogether
            | StitchKind::SlipSlipSlipKnit
            | StitchKind::CentralDoubleDecrease
            | StitchKind::SlipKnitTwoPass => StitchEffect::new(3, 1, 1),

            // n -> n over n cells
            StitchKind::Cable2Front | StitchKind::Cable2Back => StitchEffect::new(2, 2, 2),
            StitchKind::Cable3Front | StitchKind::Cable3Back => StitchEffect::new(3, 3, 3),
            StitchKind::Cable4Front | StitchKind::Cable4Back => StitchEffect::new(4, 4, 4),
            StitchKind::Cable6Front | StitchKind::Cable6Back => StitchEffect::new(6, 6, 6),
            StitchKind::Cable8Front | StitchKind::Cable8Back => StitchEffect::new(8, 8, 8),
        }
    }

    /// Number of grid cells this stitch occupies
    pub fn span(&self) -> usize {
        self.effect().span
    }

    /// Net stitch change contributed to the rows above
    pub fn net_effect(&self) -> i64 {
        self.effect().net()
    }
}

/// Effect lookup by abbreviation that never fails
///
/// Unknown abbreviations are treated as an empty placeholder so a single bad
/// cell cannot break layout.
pub fn effect_for_abbreviation(abbreviation: &str) -> StitchEffect {
    match StitchKind::from_abbreviation(abbreviation) {
        Ok(kind) => kind.effect(),
        Err(e) => {
            log::debug!("{}; using placeholder effect", e);
            StitchEffect::PLACEHOLDER
        }
    }
}

/// Total stitches consumed by a sequence of stitches
pub fn stitches_consumed<'a>(kinds: impl IntoIterator<Item = &'a StitchKind>) -> u32 {
    kinds.into_iter().map(|kind| kind.effect().consumed).sum()
}

/// Total stitches created by a sequence of stitches
pub fn stitches_created<'a>(kinds: impl IntoIterator<Item = &'a StitchKind>) -> u32 {
    kinds.into_iter().map(|kind| kind.effect().created).sum()
}
