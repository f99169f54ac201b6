//! Knitting Chart Editor WASM Module
//!
//! Core of a knitting chart editor: a grid of stitch cells whose shape follows
//! the increases and decreases knitted into it, plus a parser and renderer for
//! the written form of each row ("k2, p2, k2tog, yo").
//!
//! The presentation shell talks to [`api::KnitChartEditor`]; everything below
//! it is plain Rust and usable natively.

pub mod models;
pub mod chart;
pub mod parse;
pub mod renderers;
pub mod api;

// Re-export commonly used types
pub use models::core::*;
pub use models::elements::*;
pub use chart::{ApplyReport, Chart, ChartError, ShapeError};
pub use parse::{parse_instruction, ParseResult};
pub use renderers::{serialize_row, SerializedRow};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logging();

    log::info!("Knitting chart editor WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logging() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        crate::wasm_warn!("logger already initialized: {}", e);
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}
