//! Parsing module for written knitting instructions
//!
//! This module converts free-form knitter shorthand ("k2, p2, k2tog, yo")
//! into a flat sequence of `ParsedStitch` values.

pub mod result;
pub mod tokens;
pub mod grammar;

// Re-export commonly used types
pub use result::*;
pub use tokens::{parse_token, repeat_phrase, resolve_stitch, TokenParse};
pub use grammar::{parse_instruction, parse_with_delimiter};
