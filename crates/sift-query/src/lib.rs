//! Query document construction for Sift.
//!
//! This crate turns application-level search intent (free-text search with
//! relevance tuning, filters, geo-distance sorting and scoring, score
//! floors) into one query document for the search engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      sift-query                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  QueryBuilder (accumulates clauses, compiles on build())    │
//! │  ├── relevance: fuzzy / exact / phrase / prefix strategies  │
//! │  ├── filters: term, terms, range, geo distance, bool        │
//! │  └── sorts: SortDescriptor (FieldOrder, Distance, Scoring)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  dsl (stateless expression helpers)                         │
//! │  BoostMap / TextSearchOptions (relevance tuning inputs)     │
//! │  QueryDocument (compiled output)                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use sift_query::{BoostMap, QueryBuilder, TextSearchOptions};
//!
//! let boosts = BoostMap::from([("name", 3.0), ("description", 1.0)]);
//! let document = QueryBuilder::new()
//!     .multi_field_text_search_with_boost("espresso", &boosts, &TextSearchOptions::default())
//!     .filter_terms("tags", ["wifi", "outdoor"])
//!     .build();
//!
//! assert!(document.as_value()["query"]["bool"]["must"].is_object());
//! ```

pub mod builder;
pub mod document;
pub mod dsl;
pub mod geo;
pub mod options;
pub mod sort;

// Re-exports
pub use builder::QueryBuilder;
pub use document::QueryDocument;
pub use dsl::Fuzziness;
pub use geo::{DistanceCalculation, GeoPoint};
pub use options::{BoostMap, MatchStrategy, StrategyOptions, TextSearchOptions};
pub use sort::{DistanceParams, FieldOrderParams, SortDescriptor};
