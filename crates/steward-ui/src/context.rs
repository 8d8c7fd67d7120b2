//! Page-provided configuration, read once at startup.
//!
//! # Design
//! - The page declares its socket path, default noun, and callback hooks as
//!   globals; they are read exactly once into a context object that is passed
//!   to the binder and dispatcher. Nothing reads ambient globals after init.
//! - [`PageSettings`] stays DOM-free so noun-resolution paths test natively;
//!   only the wasm-side [`PageContext`] holds JS handles.

/// Static page settings consumed by the binder and socket client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageSettings {
    /// Socket path component; absence disables the socket entirely.
    pub socket_path: Option<String>,
    /// Default noun for API requests originating on this page.
    pub page_noun: Option<String>,
}

impl PageSettings {
    /// Whether the page asked for a socket connection at all.
    #[must_use]
    pub fn socket_enabled(&self) -> bool {
        self.socket_path.as_deref().is_some_and(|path| !path.is_empty())
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) use wasm::PageContext;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::PageSettings;
    use js_sys::{Function, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::Window;

    /// Global names from the page contract.
    const SOCKET_URL_GLOBAL: &str = "WEBSOCKET_URL";
    const PAGE_NOUN_GLOBAL: &str = "PAGE_NOUN";
    const APP_CALLBACK_GLOBAL: &str = "vue_app_cb";
    const LEGACY_CALLBACK_GLOBAL: &str = "ws_cb";

    /// Everything the page provides, captured once.
    pub(crate) struct PageContext {
        /// Socket path and default noun.
        pub(crate) settings: PageSettings,
        /// Callback receiving `vue_app_cb` payloads.
        pub(crate) app_callback: Option<Function>,
        /// Deprecated callback receiving whole `cb` frames.
        pub(crate) legacy_callback: Option<Function>,
    }

    impl PageContext {
        /// Capture the page globals from the live window.
        pub(crate) fn from_window() -> Self {
            let window = gloo::utils::window();
            Self {
                settings: PageSettings {
                    socket_path: global_string(&window, SOCKET_URL_GLOBAL),
                    page_noun: global_string(&window, PAGE_NOUN_GLOBAL),
                },
                app_callback: global_function(&window, APP_CALLBACK_GLOBAL),
                legacy_callback: global_function(&window, LEGACY_CALLBACK_GLOBAL),
            }
        }
    }

    fn global_string(window: &Window, name: &str) -> Option<String> {
        Reflect::get(window.as_ref(), &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_string())
            .filter(|value| !value.is_empty())
    }

    fn global_function(window: &Window, name: &str) -> Option<Function> {
        Reflect::get(window.as_ref(), &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_requires_a_non_empty_path() {
        assert!(!PageSettings::default().socket_enabled());
        assert!(
            !PageSettings {
                socket_path: Some(String::new()),
                page_noun: None,
            }
            .socket_enabled()
        );
        assert!(
            PageSettings {
                socket_path: Some("/ws".to_string()),
                page_noun: Some("page".to_string()),
            }
            .socket_enabled()
        );
    }
}
