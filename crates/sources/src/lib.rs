//! # wlpv sources
//!
//! Where protocol documents come from, and how they are gathered.
//!
//! ## Pipeline
//!
//! ```text
//! Catalog (one Source per namespace)
//!     │
//!     ├──> one task per Source ────────────────┐
//!     │      ├─ file: fetch one document       │
//!     │      └─ tree: list, then fetch every   │
//!     │               child concurrently       │
//!     │                                        ▼
//!     └──> rendezvous channel ──> single consumer ──> namespace → documents
//! ```
//!
//! A failing source only removes its own namespace from the result; siblings are never
//! affected. Nothing is retried and nothing times out.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wlpv_sources::{fetch_all, Catalog, SourceFetcher};
//!
//! #[tokio::main]
//! async fn main() -> wlpv_sources::Result<()> {
//!     let catalog = Catalog::online();
//!     let fetcher = Arc::new(SourceFetcher::new()?);
//!     let outcome = fetch_all(fetcher, &catalog).await?;
//!
//!     for (namespace, documents) in &outcome.documents {
//!         println!("{namespace}: {} documents", documents.len());
//!     }
//!     Ok(())
//! }
//! ```

mod catalog;
mod error;
mod fetcher;
mod gitlab;
mod local;
mod orchestrator;
mod types;

pub use catalog::{AccessMode, Catalog, Origin, Source, USER_NAMESPACE};
pub use error::{Result, SourceError};
pub use fetcher::{Fetcher, SourceFetcher};
pub use gitlab::GitlabClient;
pub use local::{find_documents, resolve_directory, LocalFiles};
pub use orchestrator::fetch_all;
pub use types::{FetchOutcome, FetchResult, RawDocument, SourceFailure};
