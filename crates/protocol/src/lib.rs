//! # wlpv protocol
//!
//! Structured view of a Wayland protocol XML document.
//!
//! ```text
//! raw bytes ──> parse_protocol() ──> Protocol ──> render_protocol() ──> detail text
//! ```
//!
//! Decoding is lenient: a document that cannot be decoded yields `Protocol::default()` so one
//! malformed file never takes a whole batch down with it.

mod parse;
mod render;
mod types;

pub use parse::{parse_protocol, try_parse_protocol};
pub use render::render_protocol;
pub use types::{Argument, Description, Entry, Enum, Event, Interface, Protocol, Request};

/// File extension every protocol document carries.
pub const DOCUMENT_EXTENSION: &str = "xml";
