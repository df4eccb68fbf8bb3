//! Common test utilities and harness for sift-store integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::Value;
use sift_core::{Document, StoreConfig};
use sift_store::mock::RecordedRequest;
use sift_store::{MockEngine, SearchStore};

/// Index used by every harness store.
pub const INDEX: &str = "places";

/// Document type used by every harness store.
pub const TYPE: &str = "place";

/// Test harness wiring a store to a mock engine.
pub struct TestHarness {
    /// Engine the store talks to
    pub engine: Arc<MockEngine>,
    /// Store under test
    pub store: SearchStore,
}

impl TestHarness {
    /// Creates a harness with default store settings.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::new(INDEX, TYPE))
    }

    /// Creates a harness with custom store settings.
    pub fn with_config(config: StoreConfig) -> Self {
        let engine = Arc::new(MockEngine::new());
        let store = SearchStore::new(engine.clone(), config);
        Self { engine, store }
    }

    /// Search requests received so far.
    pub fn searches(&self) -> Vec<sift_store::SearchRequest> {
        self.engine
            .requests()
            .into_iter()
            .filter_map(|r| match r {
                RecordedRequest::Search(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Scroll continuations received so far.
    pub fn scrolls(&self) -> Vec<sift_store::ScrollRequest> {
        self.engine
            .requests()
            .into_iter()
            .filter_map(|r| match r {
                RecordedRequest::Scroll(request) => Some(request),
                _ => None,
            })
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` identifiers `{prefix}0..{prefix}{count-1}`.
pub fn ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

/// Unwrap a JSON object literal into a document.
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
