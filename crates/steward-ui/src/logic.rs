//! Pure decision logic extracted from the DOM layer for non-wasm testing.
//!
//! # Design
//! - Attribute values are coerced the way the JS data API coerces them, so a
//!   falsy attribute (`""`, `0`, `false`, `null`) behaves exactly like an
//!   absent one. That limitation is part of the page contract and is
//!   regression-tested below.
//! - Nothing here touches the document; callers feed attribute strings in
//!   and act on the returned values.

use serde_json::Value;
use steward_events::{ApiRequest, is_truthy};

/// Interval between keepalive pings, in milliseconds.
pub const KEEPALIVE_INTERVAL_MS: u32 = 10_000;

/// Delay before honoring a reload directive, in milliseconds.
pub const RELOAD_DELAY_MS: u32 = 100;

/// Connection lifecycle for the page's single socket.
///
/// Broken is terminal for a connection instance; recovery is a full page
/// reload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkState {
    /// No connection established yet.
    #[default]
    Disconnected,
    /// Socket open; keepalive running.
    Connected,
    /// Socket failed or closed; inputs are frozen.
    Broken,
}

impl LinkState {
    /// Transition taken when the socket opens.
    #[must_use]
    pub const fn on_open(self) -> Self {
        match self {
            Self::Broken => Self::Broken,
            Self::Disconnected | Self::Connected => Self::Connected,
        }
    }

    /// Transition taken on any error or close event.
    #[must_use]
    pub const fn on_failure(self) -> Self {
        match self {
            Self::Disconnected | Self::Connected | Self::Broken => Self::Broken,
        }
    }

    /// Whether keepalives should be running.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether this connection instance is beyond recovery.
    #[must_use]
    pub const fn is_broken(self) -> bool {
        matches!(self, Self::Broken)
    }
}

/// Coerce a raw data-attribute string the way the JS data API does.
#[must_use]
pub fn coerce_attr(raw: &str) -> Value {
    match raw {
        "true" => Value::from(true),
        "false" => Value::from(false),
        "null" => Value::Null,
        other => other
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| other.parse::<f64>().map(Value::from))
            .unwrap_or_else(|_| Value::from(other)),
    }
}

/// Resolve the argument attribute of an action button.
///
/// A present-but-falsy value is indistinguishable from an absent one; both
/// yield null. Documented limitation of the page contract.
#[must_use]
pub fn resolve_arg(attr: Option<&str>) -> Value {
    attr.map_or(Value::Null, |raw| {
        let value = coerce_attr(raw);
        if is_truthy(&value) { value } else { Value::Null }
    })
}

/// Resolve an element noun, falling back to the page-level default.
#[must_use]
pub fn resolve_noun(attr: Option<&str>, page_noun: Option<&str>) -> String {
    if let Some(raw) = attr {
        let value = coerce_attr(raw);
        if is_truthy(&value) {
            return match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
        }
    }
    page_noun.unwrap_or_default().to_string()
}

/// Build an API-button request from element attributes and checked pickers.
///
/// Picker nouns are appended in DOM order, comma-separated, after the
/// resolved element/page noun; the separator is omitted while the
/// accumulated noun is empty.
#[must_use]
pub fn build_api_request(
    action: &str,
    noun_attr: Option<&str>,
    arg_attr: Option<&str>,
    page_noun: Option<&str>,
    picker_nouns: &[String],
) -> ApiRequest {
    let mut noun = resolve_noun(noun_attr, page_noun);
    for picked in picker_nouns {
        if !noun.is_empty() {
            noun.push(',');
        }
        noun.push_str(picked);
    }
    ApiRequest {
        action: action.to_string(),
        noun,
        arg: resolve_arg(arg_attr),
    }
}

/// Outcome of a click on a clickable row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowNavigation {
    /// No navigation: no usable target, or the click landed on an opted-out
    /// region.
    Stay,
    /// Navigate the current page to the URL.
    Here(String),
    /// Open the URL in a named window/tab.
    NamedTab {
        /// Navigation target.
        url: String,
        /// Window/tab name.
        tab: String,
    },
}

/// Decide what a click on a clickable row does.
#[must_use]
pub fn resolve_row_click(
    href_attr: Option<&str>,
    tabname_attr: Option<&str>,
    target_opted_out: bool,
) -> RowNavigation {
    let Some(href) = href_attr else {
        return RowNavigation::Stay;
    };
    if !is_truthy(&coerce_attr(href)) {
        return RowNavigation::Stay;
    }
    if target_opted_out {
        return RowNavigation::Stay;
    }
    match tabname_attr {
        Some(tab) if is_truthy(&coerce_attr(tab)) => RowNavigation::NamedTab {
            url: href.to_string(),
            tab: tab.to_string(),
        },
        _ => RowNavigation::Here(href.to_string()),
    }
}

/// Derive the socket URL from page location parts and the configured path.
///
/// Plain-HTTP pages get `ws://`; everything else (notably `https:`) gets
/// `wss://`.
#[must_use]
pub fn socket_url(protocol: &str, host: &str, path: &str) -> String {
    let scheme = if protocol == "http:" { "ws://" } else { "wss://" };
    format!("{scheme}{host}{path}")
}

/// Build the `data:` URI carrying a text download payload.
#[must_use]
pub fn text_download_uri(body: &str) -> String {
    format!("data:text/plain;charset=utf-8,{}", urlencoding::encode(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_state_walks_connect_then_break() {
        let state = LinkState::default();
        assert_eq!(state, LinkState::Disconnected);
        let state = state.on_open();
        assert!(state.is_connected());
        let state = state.on_failure();
        assert!(state.is_broken());
        // Broken is terminal even if the browser fires a late open event.
        assert!(state.on_open().is_broken());
    }

    #[test]
    fn attribute_coercion_matches_data_api() {
        assert_eq!(coerce_attr("true"), Value::from(true));
        assert_eq!(coerce_attr("false"), Value::from(false));
        assert_eq!(coerce_attr("null"), Value::Null);
        assert_eq!(coerce_attr("7"), Value::from(7));
        assert_eq!(coerce_attr("2.5"), Value::from(2.5));
        assert_eq!(coerce_attr("retry"), Value::from("retry"));
        assert_eq!(coerce_attr(""), Value::from(""));
    }

    #[test]
    fn falsy_args_collapse_to_null() {
        // The documented limitation: these must stay null until the contract
        // is intentionally redesigned.
        for raw in ["", "0", "false", "null"] {
            assert_eq!(resolve_arg(Some(raw)), Value::Null, "raw {raw:?}");
        }
        assert_eq!(resolve_arg(None), Value::Null);
        assert_eq!(resolve_arg(Some("1")), Value::from(1));
        assert_eq!(resolve_arg(Some("xfp")), Value::from("xfp"));
    }

    #[test]
    fn noun_falls_back_to_page_default() {
        assert_eq!(resolve_noun(Some("users"), Some("page")), "users");
        assert_eq!(resolve_noun(None, Some("page")), "page");
        assert_eq!(resolve_noun(Some(""), Some("page")), "page");
        assert_eq!(resolve_noun(Some("0"), Some("page")), "page");
        assert_eq!(resolve_noun(None, None), "");
    }

    #[test]
    fn api_request_resolves_explicit_attributes() {
        let request = build_api_request(
            "delete_user",
            Some("alice"),
            Some("force"),
            Some("users"),
            &[],
        );
        assert_eq!(request.action, "delete_user");
        assert_eq!(request.noun, "alice");
        assert_eq!(request.arg, Value::from("force"));
    }

    #[test]
    fn api_request_defaults_to_page_noun_and_null_arg() {
        let request = build_api_request("refresh", None, None, Some("summary"), &[]);
        assert_eq!(request.noun, "summary");
        assert_eq!(request.arg, Value::Null);
    }

    #[test]
    fn picker_nouns_append_after_default_in_order() {
        let picked = vec!["one".to_string(), "two".to_string()];
        let request = build_api_request("export", None, None, Some("page"), &picked);
        assert_eq!(request.noun, "page,one,two");
    }

    #[test]
    fn picker_join_skips_separator_when_noun_empty() {
        let picked = vec!["one".to_string(), "two".to_string()];
        let request = build_api_request("export", None, None, None, &picked);
        assert_eq!(request.noun, "one,two");
    }

    #[test]
    fn picker_join_is_pure() {
        let picked = vec!["one".to_string()];
        let first = build_api_request("export", None, None, Some("page"), &picked);
        let second = build_api_request("export", None, None, Some("page"), &picked);
        assert_eq!(first, second);
    }

    #[test]
    fn row_click_navigates_in_place_by_default() {
        assert_eq!(
            resolve_row_click(Some("/detail/3"), None, false),
            RowNavigation::Here("/detail/3".to_string())
        );
    }

    #[test]
    fn row_click_opens_named_tab_when_requested() {
        assert_eq!(
            resolve_row_click(Some("/log"), Some("logs"), false),
            RowNavigation::NamedTab {
                url: "/log".to_string(),
                tab: "logs".to_string(),
            }
        );
    }

    #[test]
    fn opted_out_target_suppresses_navigation() {
        assert_eq!(
            resolve_row_click(Some("/detail/3"), None, true),
            RowNavigation::Stay
        );
    }

    #[test]
    fn missing_or_falsy_href_suppresses_navigation() {
        assert_eq!(resolve_row_click(None, None, false), RowNavigation::Stay);
        assert_eq!(
            resolve_row_click(Some(""), None, false),
            RowNavigation::Stay
        );
    }

    #[test]
    fn socket_url_tracks_page_scheme() {
        assert_eq!(
            socket_url("http:", "bunker.local:8080", "/ws"),
            "ws://bunker.local:8080/ws"
        );
        assert_eq!(
            socket_url("https:", "bunker.local", "/ws"),
            "wss://bunker.local/ws"
        );
    }

    #[test]
    fn download_uri_percent_encodes_body() {
        assert_eq!(
            text_download_uri("hi there"),
            "data:text/plain;charset=utf-8,hi%20there"
        );
        assert!(text_download_uri("{\"a\": 1}").starts_with("data:text/plain;charset=utf-8,%7B"));
    }
}
