//! Document storage and search execution for Sift.
//!
//! This crate executes query documents against a search engine, flattens
//! raw hits into application documents, enumerates identifiers over scroll
//! cursors, and manages indices and mappings.
//!
//! # Features
//!
//! - `http`: Enable the `reqwest`-based REST engine adapter
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      sift-store                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchStore (one index/type)                               │
//! │  ├── search / raw_search (paged, consolidated hits)        │
//! │  ├── find_all_ids (scroll enumeration)                      │
//! │  ├── index / unindex / get / bulk (documents)               │
//! │  └── create_index / update_type_mapping (administration)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchEngine trait                                         │
//! │  ├── MockEngine (in-memory, scriptable)                     │
//! │  └── HttpEngine (REST over reqwest)                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sift_core::SiftConfig;
//! use sift_store::{SearchQuery, create_store};
//!
//! let config = SiftConfig::load("sift.toml")?;
//! let store = create_store(&config)?;
//!
//! let page = store.search(SearchQuery::new(query_document)).await?;
//! for place in page.data {
//!     println!("{}", place["_id"]);
//! }
//!
//! let every_id = store.find_all_ids(None).await?;
//! ```

pub mod bulk;
pub mod consolidate;
pub mod engine;
pub mod mock;
pub mod response;
pub mod scroll;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

// Re-exports
pub use bulk::BulkOperation;
pub use consolidate::{SCORE_FIELD, SORT_FIELD, SearchPage, consolidate_hit};
pub use engine::{DocumentRef, GetResponse, IndexRequest, ScrollRequest, SearchEngine, SearchRequest};
pub use mock::MockEngine;
pub use response::{Hit, Hits, SearchResponse};
pub use store::{SearchQuery, SearchStore};

#[cfg(feature = "http")]
pub use http::HttpEngine;

/// Create a store over the REST engine described by `config`.
#[cfg(feature = "http")]
pub fn create_store(config: &sift_core::SiftConfig) -> sift_core::Result<SearchStore> {
    let engine = HttpEngine::new(&config.engine)?;
    Ok(SearchStore::new(
        std::sync::Arc::new(engine),
        config.store.clone(),
    ))
}
