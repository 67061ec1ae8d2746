//! # wlpv store
//!
//! Turns raw documents into the sorted, read-only collection the viewer browses.
//!
//! ```text
//! namespace → RawDocument[]  ─┐
//!                             ├──> aggregate() ──> namespace → Protocol[] ──> ProtocolStore
//! user RawDocument[]  ────────┘     (basename dedup,                          (sorted, ordered,
//!                                    lenient parse)                            name lookup)
//! ```

mod aggregate;
mod store;

pub use aggregate::{aggregate, remove_shadowed, Aggregate, DuplicateWarning};
pub use store::{Namespace, ProtocolStore, StoreEntry};
pub use wlpv_sources::USER_NAMESPACE;
