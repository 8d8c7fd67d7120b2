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
//! Wire protocol for the Steward console socket channel.
//!
//! The browser client and the appliance exchange small JSON documents over a
//! single WebSocket. Outbound frames are fixed shapes ([`Ping`],
//! [`ActionRequest`], [`ApiRequest`]); inbound frames are structural — any
//! subset of known keys may appear in one document and every matching branch
//! fires. This crate owns the frame types, the ordered [`Effect`] derivation,
//! and payload decoding, and stays DOM-free so it compiles and tests natively.

mod effects;
mod error;
mod messages;
mod requests;

pub use effects::Effect;
pub use error::DecodeError;
pub use messages::{DownloadPayload, Inbound, ServerMessage, is_truthy};
pub use requests::{ActionRequest, ApiRequest, CONNECTED_ACTION, Ping};
