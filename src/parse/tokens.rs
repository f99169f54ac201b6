//! Single-token recognition
//!
//! A token is one delimiter-separated piece of an instruction outside of any
//! repeat group, or one piece inside a group. Forms handled here:
//!
//! - `k2tog`, `c4f`, `sl1` (whole abbreviation)
//! - `k10`, `k2tog3` (abbreviation fused with a count)
//! - `k2 MC` (trailing color code)
//! - `c4f twice`, `yo x3` (inline repeat suffix)

use crate::models::{Palette, ParsedStitch, StitchKind};
use crate::parse::result::{ParseError, ParseErrorKind, ParseWarning, MAX_EXPANDED_STITCHES};

/// Stitches read from one token
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenParse {
    pub stitches: Vec<ParsedStitch>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse one token into its expanded stitches
pub fn parse_token(token: &str, palette: &Palette) -> Result<TokenParse, ParseError> {
    let parts: Vec<&str> = token.split_whitespace().collect();
    let mut warnings = Vec::new();

    // Inline repeat suffix ("twice", "x3") only counts when something precedes it
    let (body, repeat) = match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() => match repeat_phrase(last) {
            Some(n) => (rest, Some(n)),
            None => (parts.as_slice(), None),
        },
        _ => (parts.as_slice(), None),
    };

    let (stitch_part, color_id) = match body {
        [stitch] => (stitch.to_string(), None),
        [stitch, code] => match palette.resolve_code(code) {
            Some(color) => (stitch.to_string(), Some(color.id.clone())),
            None => {
                warnings.push(ParseWarning::unknown_color(&code.to_uppercase()));
                (stitch.to_string(), None)
            }
        },
        _ => (body.join(" "), None),
    };

    let (kind, count) = resolve_stitch(&stitch_part)?;

    if let Some(n) = repeat {
        if kind.is_basic_knit_or_purl() && count == 1 && !has_fused_count(&stitch_part) {
            let abbr = kind.abbreviation();
            let suffix = if n == 2 { "twice".to_string() } else { format!("x{}", n) };
            return Err(ParseError::new(
                ParseErrorKind::InvalidRepeatSuffixOnBasicStitch,
                format!(
                    "Use numeric notation for basic stitches: \"{}{}\" instead of \"{} {}\"",
                    abbr, n, abbr, suffix
                ),
            )
            .with_token(token.trim()));
        }
    }

    let total = count
        .checked_mul(repeat.unwrap_or(1))
        .filter(|&n| n <= MAX_EXPANDED_STITCHES)
        .ok_or_else(|| ParseError::too_many_stitches(token.trim()))?;
    let stitch = ParsedStitch::new(kind, color_id.as_deref());
    Ok(TokenParse {
        stitches: vec![stitch; total],
        warnings,
    })
}

/// Resolve a stitch abbreviation, possibly fused with a trailing count.
///
/// Whole abbreviations win, so `k2tog` is one stitch rather than `k` x2 plus
/// garbage. Otherwise trailing digits are split off as a count.
pub fn resolve_stitch(stitch_part: &str) -> Result<(StitchKind, usize), ParseError> {
    let lower = stitch_part.trim().to_ascii_lowercase();

    if let Ok(kind) = StitchKind::from_abbreviation(&lower) {
        return Ok((kind, 1));
    }

    let digits_at = lower.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (base, digits) = lower.split_at(digits_at);
    if base.is_empty() || digits.is_empty() {
        return Err(ParseError::unknown_stitch(&lower));
    }

    let kind = StitchKind::from_abbreviation(base).map_err(|_| ParseError::unknown_stitch(base))?;
    // digits only, so a failed parse means the count overflowed
    let count = digits
        .parse::<usize>()
        .map_err(|_| ParseError::too_many_stitches(&lower))?;
    Ok((kind, count))
}

/// Read a repeat phrase: "twice", "x<N>", "x <N>", "repeat <N> [times]"
pub fn repeat_phrase(text: &str) -> Option<usize> {
    let lower = text.trim().to_lowercase();

    if lower == "twice" {
        return Some(2);
    }
    if let Some(rest) = lower.strip_prefix("repeat") {
        return leading_number(rest.trim_start());
    }
    if let Some(rest) = lower.strip_prefix('x') {
        return leading_number(rest.trim_start());
    }
    None
}

fn leading_number(text: &str) -> Option<usize> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

fn has_fused_count(stitch_part: &str) -> bool {
    stitch_part.ends_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(parse: &TokenParse) -> Vec<StitchKind> {
        parse.stitches.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_whole_abbreviation_beats_multiplier() {
        assert_eq!(resolve_stitch("k2tog"), Ok((StitchKind::KnitTwoTogether, 1)));
        assert_eq!(resolve_stitch("sl1"), Ok((StitchKind::SlipOne, 1)));
        assert_eq!(resolve_stitch("K10"), Ok((StitchKind::Knit, 10)));
        assert_eq!(resolve_stitch("k2tog3"), Ok((StitchKind::KnitTwoTogether, 3)));
    }

    #[test]
    fn test_unknown_stitch() {
        let err = resolve_stitch("zz3").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownStitch);
        assert_eq!(err.token.as_deref(), Some("zz"));
        assert!(resolve_stitch("42").is_err());
    }

    #[test]
    fn test_color_suffix() {
        let palette = Palette::default();
        let parsed = parse_token("k2 mc", &palette).unwrap();
        assert_eq!(parsed.stitches.len(), 2);
        assert!(parsed.stitches.iter().all(|s| s.color_id.as_deref() == Some("MC")));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_unknown_color_warns_and_keeps_stitch() {
        let palette = Palette::default();
        let parsed = parse_token("p3 teal", &palette).unwrap();
        assert_eq!(kinds(&parsed), vec![StitchKind::Purl; 3]);
        assert!(parsed.stitches.iter().all(|s| s.color_id.is_none()));
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].message.contains("TEAL"));
    }

    #[test]
    fn test_inline_repeat() {
        let palette = Palette::default();
        assert_eq!(kinds(&parse_token("c4f twice", &palette).unwrap()), vec![StitchKind::Cable4Front; 2]);
        assert_eq!(kinds(&parse_token("yo x3", &palette).unwrap()), vec![StitchKind::YarnOver; 3]);

        let colored = parse_token("ssk CC1 twice", &palette).unwrap();
        assert_eq!(colored.stitches.len(), 2);
        assert_eq!(colored.stitches[1].color_id.as_deref(), Some("CC1"));
    }

    #[test]
    fn test_basic_stitch_rejects_suffix() {
        let palette = Palette::default();
        for token in ["k twice", "p x4", "k MC twice"] {
            let err = parse_token(token, &palette).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::InvalidRepeatSuffixOnBasicStitch, "{}", token);
        }
        assert_eq!(parse_token("k2 x3", &palette).unwrap().stitches.len(), 6);
    }

    #[test]
    fn test_repeat_phrases() {
        assert_eq!(repeat_phrase("twice"), Some(2));
        assert_eq!(repeat_phrase("x5"), Some(5));
        assert_eq!(repeat_phrase("x 12"), Some(12));
        assert_eq!(repeat_phrase("Repeat 5 times"), Some(5));
        assert_eq!(repeat_phrase("repeat"), None);
        assert_eq!(repeat_phrase("k2"), None);
        assert_eq!(repeat_phrase("twicefoo"), None);
    }

    #[test]
    fn test_oversized_counts_are_errors() {
        let palette = Palette::default();
        for token in ["ssk18446744073709551615 x2", "k4000000000", "yo x10001"] {
            let err = parse_token(token, &palette).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::TooManyStitches, "{}", token);
        }
        assert_eq!(parse_token("k10000", &palette).unwrap().stitches.len(), 10_000);
    }
}
