//! Instruction grammar
//!
//! ```text
//! instruction := item (DELIM item)*
//! item        := token | group
//! group       := OPEN token (DELIM token)* CLOSE [DELIM] repeat
//! repeat      := "twice" | "x" N | "repeat" N ["times"]
//! ```
//!
//! `OPEN`/`CLOSE` are `*`/`*` or `(`/`)`. The delimiter is one of `,` `.` `|`
//! and is the same inside and outside of groups.

use crate::models::{Delimiter, Palette, ParsedStitch};
use crate::parse::result::{
    ParseError, ParseErrorKind, ParseResult, ParseWarning, MAX_EXPANDED_STITCHES,
};
use crate::parse::tokens::{parse_token, repeat_phrase};

/// Parse an instruction.
///
/// With a delimiter hint only that delimiter is used. Without one, every
/// delimiter is attempted in [`Delimiter::ATTEMPT_ORDER`]; the first fully
/// successful parse wins, otherwise the attempt with the fewest errors.
pub fn parse_instruction(text: &str, hint: Option<Delimiter>, palette: &Palette) -> ParseResult {
    if text.trim().is_empty() {
        return ParseResult::finish(Vec::new(), vec![ParseError::empty_input()], Vec::new());
    }

    if let Some(delimiter) = hint {
        return parse_with_delimiter(text, delimiter, palette);
    }

    let mut best: Option<ParseResult> = None;
    for delimiter in Delimiter::ATTEMPT_ORDER {
        let result = parse_with_delimiter(text, delimiter, palette);
        log::debug!(
            "parse attempt {:?}: {} stitches, {} errors",
            delimiter,
            result.total_stitch_count,
            result.errors.len()
        );
        if result.success {
            return result;
        }
        let better = best
            .as_ref()
            .map_or(true, |current| result.errors.len() < current.errors.len());
        if better {
            best = Some(result);
        }
    }
    best.unwrap_or_default()
}

/// Parse an instruction split on a single delimiter
pub fn parse_with_delimiter(text: &str, delimiter: Delimiter, palette: &Palette) -> ParseResult {
    if text.trim().is_empty() {
        return ParseResult::finish(Vec::new(), vec![ParseError::empty_input()], Vec::new());
    }

    let tokens: Vec<&str> = text.split(delimiter.as_char()).collect();
    let mut stitches = Vec::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index].trim();
        if token.is_empty() {
            index += 1;
            continue;
        }

        if let Some(marker) = GroupMarker::opening(token) {
            match parse_group(&tokens, index, marker, palette) {
                Ok(group) => {
                    if exceeds_limit(stitches.len(), group.stitches.len()) {
                        errors.push(ParseError::too_many_stitches(token).at(index));
                    } else {
                        stitches.extend(group.stitches);
                        warnings.extend(group.warnings);
                    }
                    index = group.last_index + 1;
                }
                Err(failure) => {
                    errors.extend(failure.errors);
                    index = failure.resume_at;
                }
            }
            continue;
        }

        match parse_token(token, palette) {
            Ok(parsed) if exceeds_limit(stitches.len(), parsed.stitches.len()) => {
                errors.push(ParseError::too_many_stitches(token).at(index));
            }
            Ok(parsed) => {
                stitches.extend(parsed.stitches);
                warnings.extend(parsed.warnings);
            }
            Err(err) => errors.push(err.at(index)),
        }
        index += 1;
    }

    ParseResult::finish(stitches, errors, warnings)
}

fn exceeds_limit(current: usize, added: usize) -> bool {
    current.saturating_add(added) > MAX_EXPANDED_STITCHES
}

// ============================================================================
// Repeat groups
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GroupMarker {
    Asterisk,
    Paren,
}

impl GroupMarker {
    fn opening(token: &str) -> Option<Self> {
        match token.chars().next() {
            Some('*') => Some(GroupMarker::Asterisk),
            Some('(') => Some(GroupMarker::Paren),
            _ => None,
        }
    }

    fn open(self) -> char {
        match self {
            GroupMarker::Asterisk => '*',
            GroupMarker::Paren => '(',
        }
    }

    fn close(self) -> char {
        match self {
            GroupMarker::Asterisk => '*',
            GroupMarker::Paren => ')',
        }
    }

    fn example(self) -> &'static str {
        match self {
            GroupMarker::Asterisk => "*pattern*",
            GroupMarker::Paren => "(pattern)",
        }
    }
}

struct GroupParse {
    stitches: Vec<ParsedStitch>,
    warnings: Vec<ParseWarning>,
    /// Index of the last token belonging to the group (closing or count token)
    last_index: usize,
}

struct GroupFailure {
    errors: Vec<ParseError>,
    resume_at: usize,
}

impl GroupFailure {
    fn single(error: ParseError, resume_at: usize) -> Self {
        Self {
            errors: vec![error],
            resume_at,
        }
    }
}

fn parse_group(
    tokens: &[&str],
    start: usize,
    marker: GroupMarker,
    palette: &Palette,
) -> Result<GroupParse, GroupFailure> {
    let (end, close_at) = match find_closing(tokens, start, marker) {
        Some(found) => found,
        None => {
            let err = ParseError::new(
                ParseErrorKind::UnbalancedMarkers,
                format!(
                    "Unbalanced repeat markers ({}{}). Please use \"{}\" format.",
                    marker.open(),
                    marker.close(),
                    marker.example()
                ),
            )
            .with_token(tokens[start].trim())
            .at(start);
            return Err(GroupFailure::single(err, start + 1));
        }
    };

    let closing_token = tokens[end].trim();
    let after_close = closing_token[close_at + 1..].trim();

    let mut last_index = end;
    let mut count = if after_close.is_empty() { None } else { repeat_phrase(after_close) };
    if count.is_none() && end + 1 < tokens.len() {
        if let Some(n) = repeat_phrase(tokens[end + 1]) {
            count = Some(n);
            last_index = end + 1;
        }
    }

    let count = match count {
        Some(n) if n >= 1 => n,
        _ => {
            let group_text = tokens[start..=end]
                .iter()
                .map(|t| t.trim())
                .collect::<Vec<_>>()
                .join(", ");
            let err = ParseError::new(
                ParseErrorKind::MissingRepeatCount,
                format!(
                    "Repeat count not found. Use \"{0} repeat N times\", \"{0} xN\", or \"{0} twice\".",
                    marker.example()
                ),
            )
            .with_token(group_text)
            .at(start);
            return Err(GroupFailure::single(err, last_index + 1));
        }
    };

    let mut pattern = Vec::new();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    for (offset, inner) in inner_tokens(tokens, start, end, close_at).into_iter().enumerate() {
        if inner.is_empty() {
            continue;
        }
        match parse_token(inner, palette) {
            Ok(parsed) => {
                pattern.extend(parsed.stitches);
                warnings.extend(parsed.warnings);
            }
            Err(err) => errors.push(err.at(start + offset)),
        }
    }

    if !errors.is_empty() {
        return Err(GroupFailure {
            errors,
            resume_at: last_index + 1,
        });
    }

    let total = match pattern.len().checked_mul(count) {
        Some(total) if total <= MAX_EXPANDED_STITCHES => total,
        _ => {
            let err = ParseError::too_many_stitches(tokens[start].trim()).at(start);
            return Err(GroupFailure::single(err, last_index + 1));
        }
    };

    let mut stitches = Vec::with_capacity(total);
    for _ in 0..count {
        stitches.extend(pattern.iter().cloned());
    }

    Ok(GroupParse {
        stitches,
        warnings,
        last_index,
    })
}

/// Locate the closing marker: (token index, byte offset within the trimmed token).
/// The opening character itself is skipped in the first token.
fn find_closing(tokens: &[&str], start: usize, marker: GroupMarker) -> Option<(usize, usize)> {
    tokens.iter().enumerate().skip(start).find_map(|(index, raw)| {
        let token = raw.trim();
        let from = if index == start { marker.open().len_utf8() } else { 0 };
        token[from..]
            .find(marker.close())
            .map(|offset| (index, from + offset))
    })
}

/// Group body pieces with the markers stripped
fn inner_tokens<'a>(tokens: &[&'a str], start: usize, end: usize, close_at: usize) -> Vec<&'a str> {
    (start..=end)
        .map(|index| {
            let token = tokens[index].trim();
            let body_end = if index == end { close_at } else { token.len() };
            let body_start = if index == start { 1 } else { 0 };
            token[body_start..body_end].trim()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StitchKind;

    fn kinds(result: &ParseResult) -> Vec<StitchKind> {
        result.stitches.iter().map(|s| s.kind).collect()
    }

    fn comma(text: &str) -> ParseResult {
        parse_with_delimiter(text, Delimiter::Comma, &Palette::default())
    }

    #[test]
    fn test_simple_sequence() {
        let result = comma("k2, p2, k2tog, yo, k10");
        assert!(result.success);
        let mut expected = vec![
            StitchKind::Knit,
            StitchKind::Knit,
            StitchKind::Purl,
            StitchKind::Purl,
            StitchKind::KnitTwoTogether,
            StitchKind::YarnOver,
        ];
        expected.extend(std::iter::repeat(StitchKind::Knit).take(10));
        assert_eq!(kinds(&result), expected);
        assert_eq!(result.total_stitch_count, 16);
    }

    #[test]
    fn test_asterisk_group_fused_count() {
        let result = comma("*k2, p2* x5");
        assert!(result.success);
        assert_eq!(result.total_stitch_count, 20);
        assert_eq!(&kinds(&result)[..4], &[StitchKind::Knit, StitchKind::Knit, StitchKind::Purl, StitchKind::Purl]);
    }

    #[test]
    fn test_group_count_in_next_token() {
        let result = comma("(k1, p1), repeat 3 times, k2");
        assert!(result.success, "{:?}", result.errors);
        assert_eq!(result.total_stitch_count, 8);
        assert_eq!(kinds(&result)[6..].to_vec(), vec![StitchKind::Knit; 2]);
    }

    #[test]
    fn test_single_token_group() {
        let result = comma("(ssk) twice");
        assert!(result.success);
        assert_eq!(kinds(&result), vec![StitchKind::SlipSlipKnit; 2]);
    }

    #[test]
    fn test_group_inline_repeat_applies() {
        let result = comma("*c4f twice, p2* x2");
        assert!(result.success);
        assert_eq!(result.total_stitch_count, 8);
    }

    #[test]
    fn test_unbalanced_markers() {
        let result = comma("*k2, p2, k1");
        assert!(!result.success);
        assert_eq!(result.error_kinds()[0], ParseErrorKind::UnbalancedMarkers);
        // tokens after the opening one are still attempted
        assert_eq!(result.total_stitch_count, 3);
    }

    #[test]
    fn test_missing_repeat_count() {
        let result = comma("(k2, p2), k1");
        assert_eq!(result.error_kinds(), vec![ParseErrorKind::MissingRepeatCount]);
        assert_eq!(kinds(&result), vec![StitchKind::Knit]);

        let zero = comma("(k2, p2) x0");
        assert_eq!(zero.error_kinds(), vec![ParseErrorKind::MissingRepeatCount]);
    }

    #[test]
    fn test_inner_failure_fails_whole_group() {
        let result = comma("k1, (k2, zz) twice, p1");
        assert_eq!(result.error_kinds(), vec![ParseErrorKind::UnknownStitch]);
        assert_eq!(kinds(&result), vec![StitchKind::Knit, StitchKind::Purl]);
        assert_eq!(result.errors[0].position, Some(2));
    }

    #[test]
    fn test_bad_token_does_not_stop_others() {
        let result = comma("k2, bogus, p1");
        assert!(!result.success);
        assert_eq!(result.total_stitch_count, 3);
        assert_eq!(result.errors[0].position, Some(1));
    }

    #[test]
    fn test_delimiter_detection() {
        let palette = Palette::default();
        let period = parse_instruction("k2. p2. yo", None, &palette);
        assert!(period.success);
        assert_eq!(period.total_stitch_count, 5);

        let pipe = parse_instruction("k1 | p1 | k1", None, &palette);
        assert!(pipe.success);
        assert_eq!(pipe.total_stitch_count, 3);
    }

    #[test]
    fn test_hint_is_binding() {
        let result = parse_instruction("k2. p2", Some(Delimiter::Comma), &Palette::default());
        assert!(!result.success);
    }

    #[test]
    fn test_empty_input() {
        let result = parse_instruction("   ", None, &Palette::default());
        assert_eq!(result.error_kinds(), vec![ParseErrorKind::EmptyInput]);
        assert_eq!(result.total_stitch_count, 0);
    }
}
