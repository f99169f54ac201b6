//! Renderers module for the knitting chart editor
//!
//! This module contains the export logic for turning chart rows into
//! written instructions.

pub mod text;

// Re-export commonly used types
pub use text::{serialize_row, SerializedRow};
