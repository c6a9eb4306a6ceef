use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::write(&format_args!($($t)*).to_string()))
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn write(s: &str);
}

pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Route `log` records and `tracing` events at or above `level` to the
/// browser console.
///
/// Only the first call installs anything; it returns whether it did.
pub fn install(level: Level) -> bool {
    let config = WASMLayerConfigBuilder::new().set_max_level(level).build();
    // `try_init` also bridges the `log` facade the table crate logs through.
    tracing_subscriber::registry()
        .with(WASMLayer::new(config))
        .try_init()
        .is_ok()
}

pub fn parse_level(level: Option<&str>) -> Result<Level, String> {
    match level.map(str::trim) {
        None | Some("") => Ok(DEFAULT_LEVEL),
        Some(level) => {
            Level::from_str(level).map_err(|e| format!("invalid log level `{}`: {}", level, e))
        }
    }
}
