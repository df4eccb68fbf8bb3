//! Search engine collaborator trait and request types.
//!
//! `SearchStore` never talks to the network itself. It builds requests and
//! hands them to a [`SearchEngine`], which owns the connection.
//!
//! # Implementations
//!
//! - `MockEngine`: In-memory scripted engine for tests
//! - `HttpEngine`: REST client over `reqwest` (requires `http` feature)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sift_core::{Document, Result};

/// Identity of one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Index holding the document.
    pub index: String,
    /// Document type within the index.
    pub doc_type: String,
    /// Document identifier.
    pub id: String,
}

/// Upsert of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRequest {
    /// Target index.
    pub index: String,
    /// Target document type.
    pub doc_type: String,
    /// Identifier; `None` lets the engine assign one.
    pub id: Option<String>,
    /// Stored fields, without the identifier.
    pub body: Document,
}

/// A search against one index/type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Target index.
    pub index: String,
    /// Target document type.
    pub doc_type: String,
    /// Query document, passed through verbatim.
    pub body: Value,
    /// Offset of the first hit.
    pub from: Option<usize>,
    /// Maximum hits to return.
    pub size: usize,
    /// Open a scroll cursor with this lifetime.
    pub scroll: Option<String>,
    /// Sort keys passed alongside the body (e.g. `_doc`).
    pub sort: Vec<String>,
}

/// Continuation of an open scroll cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRequest {
    /// Cursor token from the previous response.
    pub scroll_id: String,
    /// How long to keep the cursor alive after this round.
    pub scroll: String,
}

/// Result of a single-document fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    /// Requested identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Whether the document exists.
    #[serde(default)]
    pub found: bool,

    /// Stored fields, when found.
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Document>,
}

impl GetResponse {
    /// A response for a document that does not exist.
    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            found: false,
            source: None,
        }
    }
}

/// Operations a search engine client must provide.
///
/// Search and scroll return the engine's raw JSON so callers can opt into
/// the unmodified response; everything else is acknowledged with the
/// engine's reply.
///
/// Implementations must map transport failures to
/// [`Error::Connection`](sift_core::Error::Connection) or
/// [`Error::Timeout`](sift_core::Error::Timeout), and operations the engine
/// rejects to [`Error::Engine`](sift_core::Error::Engine).
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Upsert a document.
    async fn index(&self, request: IndexRequest) -> Result<Value>;

    /// Delete a document.
    async fn delete(&self, target: &DocumentRef) -> Result<Value>;

    /// Fetch a document. A missing document is `found: false`, not an error.
    async fn get(&self, target: &DocumentRef) -> Result<GetResponse>;

    /// Check whether a document exists.
    async fn exists(&self, target: &DocumentRef) -> Result<bool>;

    /// Partially update a document.
    async fn update(&self, target: &DocumentRef, body: Value) -> Result<Value>;

    /// Submit action/source line pairs in one round trip.
    async fn bulk(&self, index: &str, doc_type: &str, lines: Vec<Value>) -> Result<Value>;

    /// Execute a search.
    async fn search(&self, request: SearchRequest) -> Result<Value>;

    /// Fetch the next batch of an open scroll.
    async fn scroll(&self, request: ScrollRequest) -> Result<Value>;

    /// Create an index with optional settings/mappings.
    async fn create_index(&self, index: &str, body: Value) -> Result<Value>;

    /// Delete an index.
    async fn delete_index(&self, index: &str) -> Result<Value>;

    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool>;

    /// Apply a mapping update to an index/type.
    async fn put_mapping(&self, index: &str, doc_type: &str, body: Value) -> Result<Value>;

    /// Get the engine name for diagnostics.
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
