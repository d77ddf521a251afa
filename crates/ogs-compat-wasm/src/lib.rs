//! ogs-compat-wasm: browser bindings for the web client
//!
//! This crate exposes to JavaScript:
//! - Rank labels for users, challenges and raw legacy numbers
//! - Seek graph challenge annotation, filtering and ordering
//! - A `Translator` object for REST request and response bodies

use wasm_bindgen::prelude::*;

pub mod challenges;
pub mod error;
pub mod ranks;
pub mod translator;

// Re-export ogs-compat-core types
pub use ogs_compat_core::*;

pub use error::BindingError;
pub use translator::Translator;

#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("ogs-compat-wasm initialized");
}
