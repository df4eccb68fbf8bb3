//! Document store over a search engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sift_core::StoreConfig;
//! use sift_store::{SearchQuery, SearchStore};
//!
//! let store = SearchStore::new(Arc::new(engine), StoreConfig::new("places", "place"));
//!
//! let page = store.search(SearchQuery::new(query_document).with_size(20)).await?;
//! println!("{} of {} places", page.data.len(), page.total);
//! ```

use std::sync::Arc;

use serde_json::{Value, json};
use sift_core::document::{split_id, with_id};
use sift_core::{Document, Error, Result, StoreConfig, validate_index_name};

use crate::bulk::{BulkOperation, encode_operations};
use crate::consolidate::{SearchPage, consolidate_hit};
use crate::engine::{DocumentRef, GetResponse, IndexRequest, SearchEngine, SearchRequest};
use crate::response::SearchResponse;

/// A paged search: the query document plus pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Query document, executed verbatim.
    pub body: Value,
    /// Offset of the first hit.
    pub from: usize,
    /// Page size; the store's configured page size when `None`.
    pub size: Option<usize>,
}

impl SearchQuery {
    /// Search with `body` from the first hit with the default page size.
    pub fn new(body: impl Into<Value>) -> Self {
        Self {
            body: body.into(),
            from: 0,
            size: None,
        }
    }

    /// Set the offset of the first hit.
    pub fn with_from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    /// Set the page size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}

/// Executes query documents and document operations against one
/// index/type.
///
/// The store holds no mutable state: the index identity is fixed at
/// construction and every call builds its own request, so a store can be
/// shared across tasks freely.
#[derive(Clone)]
pub struct SearchStore {
    pub(crate) engine: Arc<dyn SearchEngine>,
    pub(crate) config: StoreConfig,
}

impl SearchStore {
    /// Create a store over `engine` for the index/type in `config`.
    pub fn new(engine: Arc<dyn SearchEngine>, config: StoreConfig) -> Self {
        Self { engine, config }
    }

    /// Index this store operates on.
    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }

    /// Document type this store operates on.
    pub fn type_name(&self) -> &str {
        &self.config.type_name
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether `err` is a connectivity failure (no nodes, connection fault,
    /// timeout).
    pub fn is_connection_error(err: &Error) -> bool {
        err.is_connection_error()
    }

    fn document_ref(&self, id: &str) -> DocumentRef {
        DocumentRef {
            index: self.config.index_name.clone(),
            doc_type: self.config.type_name.clone(),
            id: id.to_string(),
        }
    }

    fn search_request(&self, query: SearchQuery) -> SearchRequest {
        SearchRequest {
            index: self.config.index_name.clone(),
            doc_type: self.config.type_name.clone(),
            body: query.body,
            from: Some(query.from),
            size: query.size.unwrap_or(self.config.page_size),
            scroll: None,
            sort: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Upsert a document, taking its identifier from `_id`.
    ///
    /// Failures are logged here. The returned result is informational;
    /// fire-and-forget callers may drop it.
    pub async fn index(&self, document: Document) -> Result<()> {
        log::trace!(
            "indexing document {} into {}/{}",
            Value::Object(document.clone()),
            self.config.index_name,
            self.config.type_name
        );

        let result = async {
            let (id, body) = split_id(document)?;
            self.engine
                .index(IndexRequest {
                    index: self.config.index_name.clone(),
                    doc_type: self.config.type_name.clone(),
                    id,
                    body,
                })
                .await
        }
        .await;

        result.map(drop).inspect_err(|e| log::error!("{e}"))
    }

    /// Delete a document by identifier.
    ///
    /// Failures are logged here. The returned result is informational;
    /// fire-and-forget callers may drop it.
    pub async fn unindex(&self, id: &str) -> Result<()> {
        log::trace!("unindexing doc _id={id}");
        self.engine
            .delete(&self.document_ref(id))
            .await
            .map(drop)
            .inspect_err(|e| log::error!("{e}"))
    }

    /// Fetch a document with its identifier merged back in.
    ///
    /// Returns `None` when the document does not exist or the fetch fails;
    /// fetch failures are logged.
    pub async fn get(&self, id: &str) -> Option<Document> {
        match self.find_by_id(id).await {
            Ok(response) if response.found => {
                Some(with_id(response.source.unwrap_or_default(), id))
            }
            Ok(_) => None,
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    /// Fetch the engine's raw answer for one document.
    pub async fn find_by_id(&self, id: &str) -> Result<GetResponse> {
        self.engine.get(&self.document_ref(id)).await
    }

    /// Whether a document with this identifier exists.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        self.engine.exists(&self.document_ref(id)).await
    }

    /// Merge `properties` into a stored document without replacing it.
    pub async fn update_properties(&self, id: &str, properties: Document) -> Result<Value> {
        self.engine
            .update(&self.document_ref(id), json!({ "doc": properties }))
            .await
    }

    /// Submit a batch of operations in one round trip.
    ///
    /// Per-operation outcomes are returned as the engine reported them.
    pub async fn bulk(&self, operations: &[BulkOperation]) -> Result<Value> {
        let lines = encode_operations(operations);
        log::trace!(
            "processing bulk request {}",
            Value::Array(lines.clone())
        );
        self.engine
            .bulk(&self.config.index_name, &self.config.type_name, lines)
            .await
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// Create the configured index with optional settings/mappings.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without contacting the engine, if the
    /// index name is malformed.
    pub async fn create_index(&self, mappings: Option<Value>) -> Result<Value> {
        validate_index_name(&self.config.index_name)?;
        let body = mappings.unwrap_or_else(|| json!({}));
        self.engine
            .create_index(&self.config.index_name, body)
            .await
    }

    /// Whether the configured index exists.
    pub async fn index_exists(&self) -> Result<bool> {
        self.engine.index_exists(&self.config.index_name).await
    }

    /// Delete the configured index.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without contacting the engine, if the
    /// index name is malformed.
    pub async fn delete_index(&self) -> Result<Value> {
        validate_index_name(&self.config.index_name)?;
        self.engine.delete_index(&self.config.index_name).await
    }

    /// Apply field mappings to the configured index/type.
    pub async fn update_type_mapping(&self, properties: Value) -> Result<Value> {
        self.engine
            .put_mapping(
                &self.config.index_name,
                &self.config.type_name,
                json!({ "properties": properties }),
            )
            .await
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Execute a query document and return the engine's response as-is.
    pub async fn raw_search(&self, query: SearchQuery) -> Result<Value> {
        self.engine.search(self.search_request(query)).await
    }

    /// Execute a query document and consolidate every hit.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchPage> {
        let raw = self.engine.search(self.search_request(query)).await?;
        let response = SearchResponse::from_value(raw)?;

        let reported_total = response.hits.total;
        let data: Vec<Document> = response
            .hits
            .hits
            .into_iter()
            .map(consolidate_hit)
            .collect();
        let total = reported_total.unwrap_or(data.len() as u64);

        Ok(SearchPage { data, total })
    }
}

impl std::fmt::Debug for SearchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchStore")
            .field("engine", &self.engine.name())
            .field("index", &self.config.index_name)
            .field("type", &self.config.type_name)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
