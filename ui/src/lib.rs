#![warn(rust_2018_idioms)]

//! Browser side of tablecast: keeps the table drawing in the page in step
//! with the snapshots pushed by the server.

#[macro_use]
pub mod console;
mod client;
pub mod dom;

pub use client::TableClient;
pub use dom::DomView;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Send log output at or above `level` (`"trace"` to `"error"`, default
/// `"info"`) to the browser console.
///
/// Call before [`TableClient::connect`], which otherwise installs the
/// default level. Returns `false` when logging was already set up.
#[wasm_bindgen]
pub fn init_logging(level: Option<String>) -> Result<bool, JsValue> {
    let level = console::parse_level(level.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    Ok(console::install(level))
}
