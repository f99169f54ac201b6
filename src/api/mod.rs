//! Knitting chart editor WASM API
//!
//! This module provides the JavaScript-facing API for the chart editor.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, validation, error handling, and logging
//! - `types`: Result types returned to JavaScript (`EditResult`, `DirtyRow`)
//! - `core`: The `KnitChartEditor` session plus stateless parse/serialize entry points

pub mod helpers;
pub mod types;
pub mod core;

pub use self::core::*;
pub use types::{ApplyTextResult, DirtyRow, EditResult};
