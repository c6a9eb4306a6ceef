use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use tablecast_table::protocol::Event;
use tablecast_table::{RenderOptions, Renderer};

use crate::dom::DomView;

fn table_addr() -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let location = window.location();
    Ok(format!(
        "ws://{}:{}/table",
        location.hostname()?,
        location.port()?
    ))
}

fn parse_options(options_json: Option<String>) -> Result<RenderOptions, JsValue> {
    match options_json.as_deref().map(str::trim) {
        None | Some("") => Ok(RenderOptions::default()),
        Some(json) => serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid render options: {}", e))),
    }
}

/// A viewer connection that repaints the page on every `config` event.
#[wasm_bindgen]
pub struct TableClient {
    ws: WebSocket,
}

#[wasm_bindgen]
impl TableClient {
    /// Connect to the table feed of the server that served this page.
    ///
    /// `options_json` is an optional JSON [`RenderOptions`] object; missing
    /// keys take their defaults.
    pub fn connect(options_json: Option<String>) -> Result<TableClient, JsValue> {
        crate::console::install(crate::console::DEFAULT_LEVEL);
        let renderer = Renderer::new(parse_options(options_json)?);
        let mut view = DomView::from_window()?;
        let addr = table_addr()?;
        let ws = WebSocket::new(&addr)?;

        let onmessage_callback = Closure::wrap(Box::new(move |e: MessageEvent| {
            let text = match e.data().as_string() {
                Some(text) => text,
                None => {
                    warn!("ignoring non-text frame: {:?}", e.data());
                    return;
                }
            };
            match Event::from_json(&text) {
                Ok(Event::Config(snapshot)) => match renderer.render(&mut view, &snapshot) {
                    Ok(pass) => debug!("render pass: {:?}", pass),
                    Err(e) => error!("render pass aborted: {}", e),
                },
                Err(e) => error!("error decoding event: {}", e),
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(onmessage_callback.as_ref().unchecked_ref()));
        onmessage_callback.forget();

        let onerror_callback = Closure::wrap(Box::new(move |e: ErrorEvent| {
            console_log!("error event: {:?}", e.message());
        }) as Box<dyn FnMut(ErrorEvent)>);
        ws.set_onerror(Some(onerror_callback.as_ref().unchecked_ref()));
        onerror_callback.forget();

        let onclose_callback = Closure::wrap(Box::new(move |e: CloseEvent| {
            info!("table feed closed ({}): {}", e.code(), e.reason());
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(onclose_callback.as_ref().unchecked_ref()));
        onclose_callback.forget();

        let onopen_callback = Closure::wrap(Box::new(move |_| {
            console_log!("connected to {}", addr);
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(onopen_callback.as_ref().unchecked_ref()));
        onopen_callback.forget();

        Ok(TableClient { ws })
    }

    /// Stop listening for table events.
    pub fn close(&self) -> Result<(), JsValue> {
        self.ws.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablecast_table::address::ButtonAddressing;

    #[test]
    fn missing_options_take_the_defaults() {
        assert_eq!(parse_options(None).ok(), Some(RenderOptions::default()));
        assert_eq!(parse_options(Some("  ".into())).ok(), Some(RenderOptions::default()));
    }

    #[test]
    fn options_are_read_from_json() {
        let options = parse_options(Some(
            r#"{"include_street_commits": false, "button_addressing": "direct"}"#.into(),
        ))
        .ok()
        .expect("options to parse");
        assert!(!options.include_street_commits);
        assert!(options.include_stacks);
        assert_eq!(options.button_addressing, ButtonAddressing::Direct);
    }
}
