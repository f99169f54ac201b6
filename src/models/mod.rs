//! Models module for the knitting chart editor
//!
//! This module contains the data models used by the chart engine and
//! the notation parser/serializer.

pub mod core;
pub mod elements;
pub mod effects;
pub mod color;
pub mod config;

// Re-export commonly used types
pub use self::core::*;
pub use elements::*;
pub use effects::{effect_for_abbreviation, StitchEffect};
pub use color::{ColorDefinition, Palette, NO_COLOR};
pub use config::*;
