//! Ordered effect derivation for inbound frames.
//!
//! # Design
//! - One frame may carry several directives; derivation walks the known keys
//!   in fixed order and emits every effect whose guard holds.
//! - A modal request suppresses a bare content replacement for the same
//!   frame; all other effects are independent.
//! - A keepalive acknowledgment consumes the frame before any other key is
//!   considered.
//! - Derivation is all-or-nothing: a bad payload fails the whole frame so the
//!   caller never applies a partial effect list.

use crate::error::DecodeError;
use crate::messages::{Inbound, is_truthy, truthy_opt};
use base64::{Engine as _, engine::general_purpose};
use serde_json::Value;

/// One page effect directed by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Inject markup into the target's content region and display it as a
    /// modal. `html` is absent when the frame carried none; the content
    /// region is then left untouched.
    ShowModal {
        /// Selector of the modal element.
        selector: String,
        /// Markup for the modal's content region.
        html: Option<String>,
    },
    /// Replace the target element's inner content. Best effort; the selector
    /// may resolve to nothing.
    ReplaceHtml {
        /// Selector of the target element.
        selector: String,
        /// Replacement markup.
        html: String,
    },
    /// Set the flash banner's text and reveal it.
    FlashMessage {
        /// Banner text.
        text: String,
    },
    /// Navigate the page to the given URL.
    Redirect {
        /// Navigation target.
        url: String,
    },
    /// Reload the page after the fixed short delay.
    ScheduleReload,
    /// Offer a client-side save-as with decoded body text.
    Download {
        /// Filename offered to the user.
        filename: String,
        /// Decoded body text.
        body: String,
    },
    /// Invoke the page-registered app callback with the payload.
    AppCallback {
        /// Payload forwarded verbatim.
        payload: Value,
    },
    /// Invoke the deprecated legacy callback with the whole message.
    LegacyCallback {
        /// The full raw frame document.
        message: Value,
    },
}

impl Inbound {
    /// Derive the ordered effect list for this frame.
    ///
    /// # Errors
    /// Returns [`DecodeError::Base64`] or [`DecodeError::DownloadNotText`]
    /// when a `local_download` payload cannot be decoded; no effects from the
    /// frame are returned in that case.
    pub fn effects(&self) -> Result<Vec<Effect>, DecodeError> {
        if self.is_keepalive() {
            return Ok(Vec::new());
        }
        let msg = &self.message;
        let mut effects = Vec::new();

        if truthy_opt(msg.show_modal.as_ref()) {
            if let Some(selector) = msg.selector.as_ref().filter(|s| !s.is_empty()) {
                effects.push(Effect::ShowModal {
                    selector: selector.clone(),
                    html: msg.html.clone(),
                });
            }
        } else if let (Some(selector), Some(html)) = (
            msg.selector.as_ref().filter(|s| !s.is_empty()),
            msg.html.as_ref().filter(|h| !h.is_empty()),
        ) {
            effects.push(Effect::ReplaceHtml {
                selector: selector.clone(),
                html: html.clone(),
            });
        }

        if let Some(text) = msg.show_flash_msg.as_ref().filter(|t| !t.is_empty()) {
            effects.push(Effect::FlashMessage { text: text.clone() });
        }
        if let Some(url) = msg.redirect.as_ref().filter(|u| !u.is_empty()) {
            effects.push(Effect::Redirect { url: url.clone() });
        }
        if truthy_opt(msg.reload.as_ref()) {
            effects.push(Effect::ScheduleReload);
        }
        if let Some(payload) = msg.local_download.as_ref() {
            let body = if truthy_opt(msg.is_b64.as_ref()) {
                String::from_utf8(general_purpose::STANDARD.decode(&payload.data)?)?
            } else {
                payload.data.clone()
            };
            effects.push(Effect::Download {
                filename: payload.filename.clone(),
                body,
            });
        }
        if let Some(payload) = msg.vue_app_cb.as_ref().filter(|v| is_truthy(v)) {
            effects.push(Effect::AppCallback {
                payload: payload.clone(),
            });
        }
        if truthy_opt(msg.cb.as_ref()) {
            effects.push(Effect::LegacyCallback {
                message: self.raw.clone(),
            });
        }

        Ok(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effects_of(text: &str) -> Vec<Effect> {
        Inbound::parse(text)
            .expect("frame parses")
            .effects()
            .expect("effects derive")
    }

    #[test]
    fn keepalive_produces_no_effects() {
        assert!(effects_of(r#"{"keepalive": true}"#).is_empty());
        assert!(effects_of(r#"{"_pong": 1}"#).is_empty());
    }

    #[test]
    fn keepalive_consumes_the_whole_frame() {
        // Even when other directives ride along, an ack frame is dropped.
        assert!(effects_of(r#"{"keepalive": true, "redirect": "/x"}"#).is_empty());
    }

    #[test]
    fn redirect_yields_navigation() {
        assert_eq!(
            effects_of(r#"{"redirect": "/x"}"#),
            vec![Effect::Redirect {
                url: "/x".to_string()
            }]
        );
    }

    #[test]
    fn modal_takes_precedence_over_replacement() {
        let effects =
            effects_of(r#"{"show_modal": true, "selector": ".js-api-fail", "html": "<p>no</p>"}"#);
        assert_eq!(
            effects,
            vec![Effect::ShowModal {
                selector: ".js-api-fail".to_string(),
                html: Some("<p>no</p>".to_string()),
            }]
        );
    }

    #[test]
    fn bare_markup_replaces_content() {
        let effects = effects_of(r##"{"selector": "#status", "html": "<i>ok</i>"}"##);
        assert_eq!(
            effects,
            vec![Effect::ReplaceHtml {
                selector: "#status".to_string(),
                html: "<i>ok</i>".to_string(),
            }]
        );
    }

    #[test]
    fn falsy_modal_flag_falls_through_to_replacement() {
        let effects = effects_of(r##"{"show_modal": 0, "selector": "#s", "html": "<i>x</i>"}"##);
        assert!(matches!(effects.as_slice(), [Effect::ReplaceHtml { .. }]));
    }

    #[test]
    fn plain_download_keeps_body_verbatim() {
        let effects = effects_of(r#"{"local_download": {"filename": "a.txt", "data": "hi"}}"#);
        assert_eq!(
            effects,
            vec![Effect::Download {
                filename: "a.txt".to_string(),
                body: "hi".to_string(),
            }]
        );
    }

    #[test]
    fn base64_download_is_decoded() {
        let effects = effects_of(
            r#"{"local_download": {"filename": "a.txt", "data": "aGVsbG8="}, "is_b64": true}"#,
        );
        assert_eq!(
            effects,
            vec![Effect::Download {
                filename: "a.txt".to_string(),
                body: "hello".to_string(),
            }]
        );
    }

    #[test]
    fn bad_base64_fails_the_whole_frame() {
        let frame = Inbound::parse(
            r#"{"local_download": {"filename": "a.txt", "data": "!!!"}, "is_b64": 1, "redirect": "/x"}"#,
        )
        .expect("frame parses");
        let err = frame.effects().expect_err("must fail");
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn app_and_legacy_callbacks_both_fire_in_order() {
        let effects = effects_of(r#"{"vue_app_cb": {"update_status": 1}, "cb": 1}"#);
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[0], Effect::AppCallback { .. }));
        match &effects[1] {
            Effect::LegacyCallback { message } => {
                assert_eq!(message["cb"], Value::from(1));
                assert_eq!(message["vue_app_cb"]["update_status"], Value::from(1));
            }
            other => panic!("expected legacy callback, got {other:?}"),
        }
    }

    #[test]
    fn combined_frame_emits_effects_in_fixed_order() {
        let effects = effects_of(
            r#"{
                "show_flash_msg": "Policy file imported.",
                "vue_app_cb": {"update_policy": {}},
                "reload": true
            }"#,
        );
        assert!(matches!(effects[0], Effect::FlashMessage { .. }));
        assert!(matches!(effects[1], Effect::ScheduleReload));
        assert!(matches!(effects[2], Effect::AppCallback { .. }));
    }

    #[test]
    fn empty_frame_yields_nothing() {
        assert!(effects_of("{}").is_empty());
    }
}
