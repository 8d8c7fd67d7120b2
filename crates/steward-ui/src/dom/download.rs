//! Client-side save-as synthesis.

use crate::logic;
use wasm_bindgen::JsCast;
use web_sys::Document;

/// Offer `body` as a file download named `filename`.
///
/// Builds a hidden anchor carrying the payload as a `data:` URI, activates
/// it, and removes it again. No server round-trip; text content only.
pub(crate) fn save_text(document: &Document, filename: &str, body: &str) {
    let Ok(anchor) = document.create_element("a") else {
        return;
    };
    let _ = anchor.set_attribute("href", &logic::text_download_uri(body));
    let _ = anchor.set_attribute("download", filename);
    let _ = anchor.set_attribute("style", "display: none");

    let Some(parent) = document.body() else {
        return;
    };
    if parent.append_child(&anchor).is_ok() {
        if let Some(clickable) = anchor.dyn_ref::<web_sys::HtmlElement>() {
            clickable.click();
        }
        let _ = parent.remove_child(&anchor);
    }
}
