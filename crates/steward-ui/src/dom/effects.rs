//! Apply server-directed effects to the live document.
//!
//! # Design
//! - Missing targets are silent no-ops; a selector that resolves to nothing
//!   is not an error.
//! - Reveal/hide is class and inline-style toggling. Visual transitions are
//!   the stylesheet's business.

use crate::context::PageContext;
use crate::dom::{self, download};
use crate::logic;
use gloo::console;
use gloo::timers::callback::Timeout;
use js_sys::Function;
use serde_json::Value;
use steward_events::Effect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

/// Flash banner element id.
const FLASH_ID: &str = "js-flash-msg";
/// Flash banner content region selector.
const FLASH_CONTENT: &str = ".js-content";
/// Connection-failure banner element id.
const FAIL_ID: &str = "ws_fail_msg";
/// Modal content region selector.
const MODAL_CONTENT: &str = ".content";
/// Form controls frozen when the connection breaks.
const FROZEN_CONTROLS: &str = ".ui.main.container input, .ui.main.container select";
/// Field wrappers greyed out when the connection breaks.
const FIELD_WRAPPERS: &str = ".field";

/// Apply one effect to the document.
pub(crate) fn apply(document: &Document, ctx: &PageContext, effect: Effect) {
    match effect {
        Effect::ShowModal { selector, html } => show_modal(document, &selector, html.as_deref()),
        Effect::ReplaceHtml { selector, html } => replace_html(document, &selector, &html),
        Effect::FlashMessage { text } => flash_message(document, &text),
        Effect::Redirect { url } => redirect(&url),
        Effect::ScheduleReload => schedule_reload(),
        Effect::Download { filename, body } => download::save_text(document, &filename, &body),
        Effect::AppCallback { payload } => {
            invoke_hook(ctx.app_callback.as_ref(), &payload, "vue_app_cb");
        }
        Effect::LegacyCallback { message } => {
            invoke_hook(ctx.legacy_callback.as_ref(), &message, "ws_cb");
        }
    }
}

/// Broken-link degrade: reveal the failure banner and freeze form controls.
pub(crate) fn degrade_page(document: &Document) {
    if let Some(banner) = document.get_element_by_id(FAIL_ID) {
        reveal(&banner);
    }
    if let Ok(controls) = document.query_selector_all(FROZEN_CONTROLS) {
        dom::each_element(&controls, |control| {
            let _ = control.set_attribute("disabled", "disabled");
        });
    }
    if let Ok(fields) = document.query_selector_all(FIELD_WRAPPERS) {
        dom::each_element(&fields, |field| {
            let _ = field.class_list().add_1("disabled");
        });
    }
}

/// Show an element, undoing [`conceal`] and any `hidden` styling.
pub(crate) fn reveal(element: &Element) {
    let classes = element.class_list();
    let _ = classes.remove_1("hidden");
    let _ = classes.add_1("visible");
    if let Some(styled) = element.dyn_ref::<HtmlElement>() {
        let _ = styled.style().set_property("display", "block");
    }
}

/// Hide an element.
pub(crate) fn conceal(element: &Element) {
    let _ = element.class_list().remove_1("visible");
    if let Some(styled) = element.dyn_ref::<HtmlElement>() {
        let _ = styled.style().set_property("display", "none");
    }
}

fn show_modal(document: &Document, selector: &str, html: Option<&str>) {
    let Some(target) = query(document, selector) else {
        return;
    };
    if let Some(html) = html {
        if let Ok(Some(content)) = target.query_selector(MODAL_CONTENT) {
            content.set_inner_html(html);
        }
    }
    reveal(&target);
}

fn replace_html(document: &Document, selector: &str, html: &str) {
    if let Some(target) = query(document, selector) {
        target.set_inner_html(html);
    }
}

fn flash_message(document: &Document, text: &str) {
    let Some(banner) = document.get_element_by_id(FLASH_ID) else {
        return;
    };
    if let Ok(Some(content)) = banner.query_selector(FLASH_CONTENT) {
        content.set_text_content(Some(text));
    }
    reveal(&banner);
}

fn redirect(url: &str) {
    let _ = gloo::utils::window().location().set_href(url);
}

fn schedule_reload() {
    Timeout::new(logic::RELOAD_DELAY_MS, || {
        let _ = gloo::utils::window().location().reload();
    })
    .forget();
}

fn invoke_hook(callback: Option<&Function>, payload: &Value, hook: &'static str) {
    let Some(callback) = callback else {
        console::warn!("page hook missing", hook);
        return;
    };
    if let Err(err) = callback.call1(&JsValue::NULL, &json_to_js(payload)) {
        console::error!("page hook failed", hook, err);
    }
}

fn json_to_js(payload: &Value) -> JsValue {
    serde_json::to_string(payload)
        .ok()
        .and_then(|text| js_sys::JSON::parse(&text).ok())
        .unwrap_or(JsValue::NULL)
}

fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}
