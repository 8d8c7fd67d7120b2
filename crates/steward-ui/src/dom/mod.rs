//! DOM glue: delegated event binding and server-directed effect application.

pub(crate) mod binder;
pub(crate) mod download;
pub(crate) mod effects;

use wasm_bindgen::JsCast;
use web_sys::{Element, NodeList};

/// Run a callback for every element in a query result.
pub(crate) fn each_element(list: &NodeList, mut apply: impl FnMut(&Element)) {
    for index in 0..list.length() {
        if let Some(element) = list
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        {
            apply(&element);
        }
    }
}
