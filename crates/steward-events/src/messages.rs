//! Inbound server frames.
//!
//! # Design
//! - Decode structurally: every known key is optional and independent, so one
//!   frame may request several effects at once.
//! - Keep the raw document alongside the typed fields; the legacy callback
//!   hook receives the whole message, not a projection of it.
//! - Collect keys outside the known set so the dispatcher can log
//!   unrecognized shapes instead of dropping them silently.

use crate::error::DecodeError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// JS-style truthiness, used wherever the protocol treats a field as a flag.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn truthy_opt(value: Option<&Value>) -> bool {
    value.is_some_and(is_truthy)
}

/// File payload carried by a `local_download` frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadPayload {
    /// Filename offered in the save-as prompt.
    pub filename: String,
    /// Body text, base64-encoded when the frame sets `is_b64`.
    pub data: String,
}

/// Structural view of one inbound frame. Any subset of fields may be present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerMessage {
    /// Keepalive acknowledgment; a truthy value consumes the whole frame.
    #[serde(default)]
    pub keepalive: Option<Value>,
    /// Alternate keepalive acknowledgment emitted by the appliance.
    #[serde(default, rename = "_pong")]
    pub pong: Option<Value>,
    /// Truthy when the frame requests a modal.
    #[serde(default)]
    pub show_modal: Option<Value>,
    /// Target element selector for modal or content replacement.
    #[serde(default)]
    pub selector: Option<String>,
    /// Markup injected into the target element.
    #[serde(default)]
    pub html: Option<String>,
    /// Text for the flash banner.
    #[serde(default)]
    pub show_flash_msg: Option<String>,
    /// Navigation target URL.
    #[serde(default)]
    pub redirect: Option<String>,
    /// Truthy when the page should reload shortly.
    #[serde(default)]
    pub reload: Option<Value>,
    /// Client-side file download payload.
    #[serde(default)]
    pub local_download: Option<DownloadPayload>,
    /// Truthy when the download payload is base64-encoded.
    #[serde(default)]
    pub is_b64: Option<Value>,
    /// Payload for the page-registered app callback.
    #[serde(default)]
    pub vue_app_cb: Option<Value>,
    /// Truthy when the deprecated legacy callback should fire.
    #[serde(default)]
    pub cb: Option<Value>,
    /// Keys outside the known set, surfaced for diagnostics.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One parsed inbound frame: typed fields plus the raw document.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    /// Structurally decoded fields.
    pub message: ServerMessage,
    /// Full raw document, retained for the legacy callback hook.
    pub raw: Value,
}

impl Inbound {
    /// Parse one frame of text from the socket.
    ///
    /// # Errors
    /// Returns [`DecodeError::Json`] when the text is not a JSON document of
    /// the expected structural shape.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let raw: Value = serde_json::from_str(text)?;
        let message: ServerMessage = serde_json::from_value(raw.clone())?;
        Ok(Self { message, raw })
    }

    /// Whether this frame is a pure keepalive acknowledgment.
    ///
    /// Covers both the documented `keepalive` key and the `_pong` ack the
    /// appliance answers pings with; either consumes the frame outright.
    #[must_use]
    pub fn is_keepalive(&self) -> bool {
        truthy_opt(self.message.keepalive.as_ref()) || truthy_opt(self.message.pong.as_ref())
    }

    /// Keys present on the frame that no handler recognizes.
    #[must_use]
    pub fn unrecognized_keys(&self) -> Vec<&str> {
        self.message.extra.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_js_rules() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::from(false)));
        assert!(!is_truthy(&Value::from(0)));
        assert!(!is_truthy(&Value::from(0.0)));
        assert!(!is_truthy(&Value::from("")));
        assert!(is_truthy(&Value::from(true)));
        assert!(is_truthy(&Value::from(-1)));
        assert!(is_truthy(&Value::from("0")));
        assert!(is_truthy(&serde_json::json!({})));
        assert!(is_truthy(&serde_json::json!([])));
    }

    #[test]
    fn keepalive_matches_both_ack_spellings() {
        let keepalive = Inbound::parse(r#"{"keepalive": true}"#).expect("parses");
        assert!(keepalive.is_keepalive());
        let pong = Inbound::parse(r#"{"_pong": 1}"#).expect("parses");
        assert!(pong.is_keepalive());
        let falsy = Inbound::parse(r#"{"keepalive": 0}"#).expect("parses");
        assert!(!falsy.is_keepalive());
    }

    #[test]
    fn unknown_keys_are_collected() {
        let frame = Inbound::parse(r#"{"surprise": 1, "redirect": "/x"}"#).expect("parses");
        assert_eq!(frame.unrecognized_keys(), vec!["surprise"]);
        assert_eq!(frame.message.redirect.as_deref(), Some("/x"));
    }

    #[test]
    fn malformed_text_is_a_decode_error() {
        let err = Inbound::parse("not json").expect_err("must fail");
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn raw_document_is_retained() {
        let frame = Inbound::parse(r#"{"cb": 1, "html": "<b>x</b>"}"#).expect("parses");
        assert_eq!(frame.raw["cb"], Value::from(1));
        assert_eq!(frame.raw["html"], Value::from("<b>x</b>"));
    }
}
