//! Integration tests for identifier enumeration over scroll cursors.

use serde_json::json;
use sift_core::StoreConfig;
use sift_store::mock::batch_response;

use crate::common::{TestHarness, ids};

#[tokio::test]
async fn test_collects_every_batch_in_order() {
    let harness = TestHarness::new();
    harness
        .engine
        .push_search_response(batch_response(&ids("a", 100), Some(237), Some("c1")));
    harness
        .engine
        .push_scroll_response(batch_response(&ids("b", 100), Some(237), Some("c2")));
    harness
        .engine
        .push_scroll_response(batch_response(&ids("c", 37), Some(237), Some("c3")));

    let found = harness.store.find_all_ids(None).await.unwrap();

    let expected: Vec<String> = [ids("a", 100), ids("b", 100), ids("c", 37)].concat();
    assert_eq!(found.len(), 237);
    assert_eq!(found, expected);

    let scrolls = harness.scrolls();
    assert_eq!(scrolls.len(), 2);
    assert_eq!(scrolls[0].scroll_id, "c1");
    assert_eq!(scrolls[1].scroll_id, "c2");
}

#[tokio::test]
async fn test_empty_batch_ends_enumeration_early() {
    let harness = TestHarness::new();
    harness
        .engine
        .push_search_response(batch_response(&ids("a", 100), Some(500), Some("c1")));
    harness
        .engine
        .push_scroll_response(batch_response(&[], Some(500), Some("c2")));

    let found = harness.store.find_all_ids(None).await.unwrap();

    assert_eq!(found, ids("a", 100));
    assert_eq!(harness.scrolls().len(), 1);
}

#[tokio::test]
async fn test_opening_request_parameters() {
    let harness = TestHarness::new();
    harness
        .engine
        .push_search_response(batch_response(&[], Some(0), Some("c1")));

    harness.store.find_all_ids(None).await.unwrap();

    let searches = harness.searches();
    assert_eq!(searches.len(), 1);
    let opening = &searches[0];
    assert_eq!(opening.index, "places");
    assert_eq!(opening.doc_type, "place");
    assert_eq!(opening.size, 100);
    assert_eq!(opening.scroll.as_deref(), Some("1m"));
    assert_eq!(opening.sort, vec!["_doc".to_string()]);
    assert_eq!(
        opening.body,
        json!({"query": {"match_all": {}}, "stored_fields": []})
    );
}

#[tokio::test]
async fn test_caller_body_and_configured_batch() {
    let mut config = StoreConfig::new("places", "place");
    config.scroll_batch_size = 2;
    config.scroll_lifetime = "30s".to_string();
    let harness = TestHarness::with_config(config);

    harness
        .engine
        .push_search_response(batch_response(&ids("a", 2), Some(3), Some("c1")));
    harness
        .engine
        .push_scroll_response(batch_response(&ids("b", 1), Some(3), Some("c2")));

    let body = json!({"query": {"term": {"kind": "cafe"}}});
    let found = harness.store.find_all_ids(Some(body.clone())).await.unwrap();
    assert_eq!(found, vec!["a0", "a1", "b0"]);

    let opening = &harness.searches()[0];
    assert_eq!(opening.body, body);
    assert_eq!(opening.size, 2);
    assert_eq!(harness.scrolls()[0].scroll, "30s");
}

#[tokio::test]
async fn test_scroll_failure_propagates() {
    let harness = TestHarness::new();
    harness
        .engine
        .push_search_response(batch_response(&ids("a", 1), Some(2), Some("c1")));
    harness
        .engine
        .push_scroll_response(json!({"hits": {"hits": [{"missing_id": true}]}}));

    let err = harness.store.find_all_ids(None).await.unwrap_err();
    assert!(matches!(err, sift_core::Error::MalformedResponse { .. }));
}
