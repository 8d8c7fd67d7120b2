#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Steward console front-end glue.
//!
//! Pages are rendered by the appliance; this crate progressively enhances the
//! live document. It binds delegated click handlers for the declarative
//! data-attribute contract, owns the page's single WebSocket connection, and
//! routes server-push frames to page effects. Decision logic lives in
//! DOM-free modules ([`logic`], [`context`]) so it compiles and tests
//! natively; only the wasm32 modules touch the document.

pub mod context;
pub mod logic;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod services;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;
