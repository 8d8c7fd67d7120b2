//! Outbound frames sent by the browser client.
//!
//! Shapes here are load-bearing: the appliance dispatches on exact key names,
//! so serialization is covered by byte-for-byte tests.

use serde::Serialize;
use serde_json::Value;

/// Action name announced once per connection, carrying the page path.
pub const CONNECTED_ACTION: &str = "_connected";

/// Keepalive ping, `{"_ping": 1}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ping {
    #[serde(rename = "_ping")]
    ping: u8,
}

impl Ping {
    /// Build the fixed ping frame.
    #[must_use]
    pub const fn new() -> Self {
        Self { ping: 1 }
    }
}

impl Default for Ping {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic request: an action name plus positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequest {
    /// Action name the server dispatches on.
    pub action: String,
    /// Positional arguments, forwarded verbatim.
    pub args: Vec<Value>,
}

impl ActionRequest {
    /// Build a request from an action name and its arguments.
    #[must_use]
    pub fn new(action: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            action: action.into(),
            args,
        }
    }

    /// The handshake sent right after the socket opens.
    #[must_use]
    pub fn connected(path: &str) -> Self {
        Self::new(CONNECTED_ACTION, vec![Value::from(path)])
    }
}

/// API-button request: an action applied to a subject noun with one argument.
///
/// The `arg` is null when the originating element carried no usable argument;
/// a falsy attribute value is indistinguishable from an absent one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    /// Action name the server dispatches on.
    pub action: String,
    /// Subject noun, possibly extended with picker nouns.
    pub noun: String,
    /// Single argument value, or null.
    pub arg: Value,
}
