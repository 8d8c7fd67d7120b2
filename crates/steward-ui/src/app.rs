//! Page bootstrap: capture the page context, bind handlers, open the socket.

use crate::context::PageContext;
use crate::dom;
use crate::services::socket;
use gloo::console;
use gloo::events::EventListener;
use std::rc::Rc;

/// Entrypoint invoked by the wasm loader.
pub fn run_app() {
    console_error_panic_hook::set_once();
    on_ready(init);
}

/// Run `init` once the document has finished parsing.
fn on_ready(init: impl FnOnce() + 'static) {
    let document = gloo::utils::document();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_event| init()).forget();
    } else {
        init();
    }
}

fn init() {
    let document = gloo::utils::document();
    let ctx = Rc::new(PageContext::from_window());

    let connection = ctx
        .settings
        .socket_enabled()
        .then(|| ctx.settings.socket_path.clone())
        .flatten()
        .and_then(|path| match socket::connect(Rc::clone(&ctx), &path) {
            Ok(connection) => {
                socket::install_page_send(&connection);
                Some(connection)
            }
            Err(err) => {
                console::error!("socket connect failed", err.to_string());
                None
            }
        });

    dom::binder::install(&document, ctx, connection);
}
