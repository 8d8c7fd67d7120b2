//! Delegated click routing for the declarative page contract.
//!
//! # Design
//! - One document-level listener; targets are routed by marker class via
//!   `closest`, so handlers also cover elements rendered after load.
//! - All decision logic is in [`crate::logic`]; this module only reads
//!   attributes and performs the chosen side effect.

use crate::context::PageContext;
use crate::dom::{self, effects};
use crate::logic::{self, RowNavigation};
use crate::services::socket::Socket;
use gloo::console;
use gloo::events::EventListener;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement};

/// Marker classes and selectors from the page contract.
const API_BUTTON: &str = ".js-api-btn";
const PICKERS: &str = "input[type=checkbox].js-api-picker";
const CLEAR_ALL: &str = ".js-api-clear-all";
const SET_ALL: &str = ".js-api-set-all";
const CLICKABLE: &str = ".js-clickable";
const NOT_CLICKABLE: &str = "js-not-clickable";
const MESSAGE_CLOSE: &str = ".message .close";
const MESSAGE: &str = ".message";

/// Attribute names from the page contract.
const ACTION_ATTR: &str = "data-api-action";
const NOUN_ATTR: &str = "data-api-noun";
const ARG_ATTR: &str = "data-api-arg";
const HREF_ATTR: &str = "data-href";
const TABNAME_ATTR: &str = "data-tabname";

/// Attach the delegated click handler for the page lifetime.
pub(crate) fn install(document: &Document, ctx: Rc<PageContext>, socket: Option<Rc<Socket>>) {
    let routed = document.clone();
    let listener = EventListener::new(document, "click", move |event| {
        route_click(&routed, &ctx, socket.as_ref(), event);
    });
    listener.forget();
}

fn route_click(document: &Document, ctx: &PageContext, socket: Option<&Rc<Socket>>, event: &Event) {
    let Some(target) = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
    else {
        return;
    };

    if let Some(button) = closest(&target, API_BUTTON) {
        api_button_click(document, ctx, socket, &button);
    } else if closest(&target, CLEAR_ALL).is_some() {
        set_pickers(document, false);
    } else if closest(&target, SET_ALL).is_some() {
        set_pickers(document, true);
    } else if let Some(close) = closest(&target, MESSAGE_CLOSE) {
        if let Some(banner) = closest(&close, MESSAGE) {
            effects::conceal(&banner);
        }
    } else if let Some(row) = closest(&target, CLICKABLE) {
        row_click(&target, &row);
    }
}

fn api_button_click(
    document: &Document,
    ctx: &PageContext,
    socket: Option<&Rc<Socket>>,
    button: &Element,
) {
    let Some(action) = button.get_attribute(ACTION_ATTR) else {
        console::warn!("api button without an action");
        return;
    };
    let request = logic::build_api_request(
        &action,
        button.get_attribute(NOUN_ATTR).as_deref(),
        button.get_attribute(ARG_ATTR).as_deref(),
        ctx.settings.page_noun.as_deref(),
        &checked_picker_nouns(document),
    );
    console::log!("action", format!("{} => {}", request.noun, request.action));

    let Some(socket) = socket else {
        console::warn!("socket disabled; action dropped", action);
        return;
    };
    if let Err(err) = socket.send_api(&request) {
        console::error!("action send failed", err.to_string());
    }
}

fn checked_picker_nouns(document: &Document) -> Vec<String> {
    let mut nouns = Vec::new();
    if let Ok(pickers) = document.query_selector_all(PICKERS) {
        dom::each_element(&pickers, |picker| {
            let Some(input) = picker.dyn_ref::<HtmlInputElement>() else {
                return;
            };
            if input.checked() {
                if let Some(noun) = input.get_attribute(NOUN_ATTR) {
                    nouns.push(noun);
                }
            }
        });
    }
    nouns
}

fn set_pickers(document: &Document, checked: bool) {
    if let Ok(pickers) = document.query_selector_all(PICKERS) {
        dom::each_element(&pickers, |picker| {
            if let Some(input) = picker.dyn_ref::<HtmlInputElement>() {
                input.set_checked(checked);
            }
        });
    }
}

fn row_click(target: &Element, row: &Element) {
    let opted_out = target.class_list().contains(NOT_CLICKABLE)
        || closest(target, "td").is_some_and(|cell| cell.class_list().contains(NOT_CLICKABLE));
    match logic::resolve_row_click(
        row.get_attribute(HREF_ATTR).as_deref(),
        row.get_attribute(TABNAME_ATTR).as_deref(),
        opted_out,
    ) {
        RowNavigation::Stay => {}
        RowNavigation::Here(url) => {
            let _ = gloo::utils::window().location().set_href(&url);
        }
        RowNavigation::NamedTab { url, tab } => {
            if gloo::utils::window()
                .open_with_url_and_target(&url, &tab)
                .is_err()
            {
                console::warn!("named tab open failed", url);
            }
        }
    }
}

fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}
