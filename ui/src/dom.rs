//! The table drawing in the live page.

use log::error;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use tablecast_table::{Fill, Ink, View};

/// A [`View`] over the page's SVG table.
///
/// Card backgrounds and button indicators are painted through their `fill`
/// attribute; card text is coloured through `fill` and `stroke`.
pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        DomView { document }
    }

    /// The view over the document of the current window.
    pub fn from_window() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document in this context"))?;
        Ok(DomView::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn set_attribute(node: &Element, name: &str, value: &str) {
    if let Err(e) = node.set_attribute(name, value) {
        error!("setting {} on #{}: {:?}", name, node.id(), e);
    }
}

impl View for DomView {
    type Node = Element;

    fn find(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn select(&self, class: &str) -> Vec<Element> {
        // the live collection is copied out before anything is touched
        let collection = self.document.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn set_fill(&mut self, node: &Element, fill: Fill) {
        set_attribute(node, "fill", &fill.to_string());
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_ink(&mut self, node: &Element, ink: Ink) {
        let colour = ink.to_string();
        set_attribute(node, "fill", &colour);
        set_attribute(node, "stroke", &colour);
    }
}
