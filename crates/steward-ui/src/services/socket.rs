//! WebSocket runner for the console page.
//!
//! # Design
//! - One connection per page load. Broken is terminal for the instance;
//!   recovery is a full page reload, so there is no backoff loop here.
//! - Keepalive pings ride a fixed interval started when the socket opens and
//!   cancelled on the first failure event.
//! - Frames decode off the DOM in `steward-events`; only effect application
//!   touches the document.

use crate::context::PageContext;
use crate::dom;
use crate::logic::{self, LinkState};
use gloo::console;
use gloo::timers::callback::Interval;
use js_sys::Reflect;
use serde::Serialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use steward_events::{ActionRequest, ApiRequest, Inbound, Ping};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use web_sys::{Event, MessageEvent, WebSocket};

/// Global name of the page-facing send function.
const PAGE_SEND_GLOBAL: &str = "WEBSOCKET";

/// The page's single socket connection.
pub(crate) struct Socket {
    ws: WebSocket,
    state: Rc<Cell<LinkState>>,
    keepalive: Rc<RefCell<Option<Interval>>>,
}

impl Socket {
    /// Send an API-button request. Unguarded per the page contract: callers
    /// get the transport error when the connection is not open.
    pub(crate) fn send_api(&self, request: &ApiRequest) -> Result<(), SendError> {
        self.send_json(request)
    }

    /// Send a generic action request.
    pub(crate) fn send_action(&self, request: &ActionRequest) -> Result<(), SendError> {
        self.send_json(request)
    }

    fn send_ping(&self) -> Result<(), SendError> {
        self.send_json(&Ping::new())
    }

    fn send_json<T: Serialize>(&self, frame: &T) -> Result<(), SendError> {
        let text = serde_json::to_string(frame).map_err(|_| SendError::Encode)?;
        self.ws
            .send_with_str(&text)
            .map_err(|_| SendError::Transport)
    }
}

/// Open the socket for the configured path and attach its handlers.
///
/// # Errors
/// Returns [`ConnectError`] when the page location cannot be read or the
/// browser refuses the connection outright.
pub(crate) fn connect(ctx: Rc<PageContext>, path: &str) -> Result<Rc<Socket>, ConnectError> {
    let location = gloo::utils::window().location();
    let protocol = location.protocol().map_err(|_| ConnectError::Location)?;
    let host = location.host().map_err(|_| ConnectError::Location)?;
    let url = logic::socket_url(&protocol, &host, path);

    let ws = WebSocket::new(&url).map_err(|_| ConnectError::Open)?;
    let socket = Rc::new(Socket {
        ws,
        state: Rc::new(Cell::new(LinkState::Disconnected)),
        keepalive: Rc::new(RefCell::new(None)),
    });
    attach_handlers(&socket, ctx);
    Ok(socket)
}

/// Install the page-facing `window.WEBSOCKET(action, ...args)` function.
///
/// Wasm exports cannot be variadic; the closure takes a fixed run of slots
/// and stops at the first `undefined`, which covers every page call site.
pub(crate) fn install_page_send(socket: &Rc<Socket>) {
    let socket = Rc::clone(socket);
    let sender = Closure::<dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue, JsValue, JsValue)>::new(
        move |action: JsValue,
              first: JsValue,
              second: JsValue,
              third: JsValue,
              fourth: JsValue,
              fifth: JsValue,
              sixth: JsValue| {
            let Some(action) = action.as_string() else {
                console::error!("page send requires an action name");
                return;
            };
            let mut args = Vec::new();
            for value in [first, second, third, fourth, fifth, sixth] {
                if value.is_undefined() {
                    break;
                }
                args.push(js_to_json(&value));
            }
            let request = ActionRequest::new(action, args);
            if let Err(err) = socket.send_action(&request) {
                console::error!("page send failed", err.to_string());
            }
        },
    );
    let window = gloo::utils::window();
    if Reflect::set(
        window.as_ref(),
        &JsValue::from_str(PAGE_SEND_GLOBAL),
        sender.as_ref(),
    )
    .is_err()
    {
        console::error!("page send install failed");
    }
    sender.forget();
}

fn attach_handlers(socket: &Rc<Socket>, ctx: Rc<PageContext>) {
    let on_open = {
        let socket = Rc::clone(socket);
        Closure::<dyn FnMut()>::new(move || handle_open(&socket))
    };
    socket.ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    let on_message = {
        Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                handle_frame(&ctx, &text);
            } else {
                console::warn!("non-text frame ignored");
            }
        })
    };
    socket
        .ws
        .set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    let on_error = {
        let socket = Rc::clone(socket);
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| handle_failure(&socket))
    };
    socket
        .ws
        .set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    let on_close = {
        let socket = Rc::clone(socket);
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| handle_failure(&socket))
    };
    socket
        .ws
        .set_onclose(Some(on_close.as_ref().unchecked_ref()));
    on_close.forget();
}

fn handle_open(socket: &Rc<Socket>) {
    socket.state.set(socket.state.get().on_open());
    if !socket.state.get().is_connected() {
        return;
    }
    console::log!("socket ready");

    let pinger = Rc::clone(socket);
    *socket.keepalive.borrow_mut() = Some(Interval::new(logic::KEEPALIVE_INTERVAL_MS, move || {
        if let Err(err) = pinger.send_ping() {
            console::error!("keepalive failed", err.to_string());
        }
    }));

    let path = gloo::utils::window()
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string());
    if let Err(err) = socket.send_action(&ActionRequest::connected(&path)) {
        console::error!("handshake failed", err.to_string());
    }
}

fn handle_failure(socket: &Socket) {
    if socket.state.get().is_broken() {
        return;
    }
    socket.state.set(socket.state.get().on_failure());
    drop(socket.keepalive.borrow_mut().take());
    console::log!("socket broken");
    dom::effects::degrade_page(&gloo::utils::document());
}

fn handle_frame(ctx: &PageContext, text: &str) {
    let frame = match Inbound::parse(text) {
        Ok(frame) => frame,
        Err(err) => {
            console::error!("inbound frame rejected", err.to_string());
            return;
        }
    };
    if frame.is_keepalive() {
        return;
    }
    let unknown = frame.unrecognized_keys();
    if !unknown.is_empty() {
        console::warn!("unrecognized frame keys", unknown.join(", "));
    }
    match frame.effects() {
        Ok(effects) => {
            let document = gloo::utils::document();
            for effect in effects {
                dom::effects::apply(&document, ctx, effect);
            }
        }
        Err(err) => console::error!("frame dropped", err.to_string()),
    }
}

fn js_to_json(value: &JsValue) -> Value {
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|text| text.as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(Value::Null)
}

/// Failure while establishing the page socket.
#[derive(Debug)]
pub(crate) enum ConnectError {
    /// The page location parts were unreadable.
    Location,
    /// The browser refused to open the connection.
    Open,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location => write!(f, "page location unavailable"),
            Self::Open => write!(f, "socket open refused"),
        }
    }
}

/// Failure while transmitting a frame.
#[derive(Debug)]
pub(crate) enum SendError {
    /// The frame did not serialize.
    Encode,
    /// The transport rejected the send (not open, or already broken).
    Transport,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => write!(f, "frame encode failed"),
            Self::Transport => write!(f, "socket is not open"),
        }
    }
}
