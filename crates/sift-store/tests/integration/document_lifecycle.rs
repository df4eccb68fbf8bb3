//! Integration tests for document and index lifecycle operations.

use serde_json::{Value, json};
use sift_core::{Error, StoreConfig};
use sift_store::BulkOperation;
use sift_store::mock::RecordedRequest;

use crate::common::{INDEX, TYPE, TestHarness, doc};

#[tokio::test]
async fn test_index_get_update_unindex() {
    let harness = TestHarness::new();
    let store = &harness.store;

    store
        .index(doc(json!({"_id": "blue-bottle", "name": "Blue Bottle", "kind": "cafe"})))
        .await
        .unwrap();
    assert!(store.exists("blue-bottle").await.unwrap());

    store
        .update_properties("blue-bottle", doc(json!({"rating": 4.5})))
        .await
        .unwrap();

    let fetched = store.get("blue-bottle").await.unwrap();
    assert_eq!(
        Value::Object(fetched),
        json!({"_id": "blue-bottle", "name": "Blue Bottle", "kind": "cafe", "rating": 4.5})
    );

    store.unindex("blue-bottle").await.unwrap();
    assert!(store.get("blue-bottle").await.is_none());
    assert!(!store.exists("blue-bottle").await.unwrap());
}

#[tokio::test]
async fn test_identifier_is_not_stored_in_source() {
    let harness = TestHarness::new();
    harness
        .store
        .index(doc(json!({"_id": "a", "name": "Tartine"})))
        .await
        .unwrap();

    let stored = harness.engine.document(INDEX, "a").unwrap();
    assert!(!stored.contains_key("_id"));
}

#[tokio::test]
async fn test_numeric_identifier() {
    let harness = TestHarness::new();
    harness
        .store
        .index(doc(json!({"_id": 42, "name": "Tartine"})))
        .await
        .unwrap();

    assert!(harness.store.get("42").await.is_some());
}

#[tokio::test]
async fn test_failures_are_logged_and_returned() {
    let harness = TestHarness::new();
    harness.engine.fail_with_connection_error();

    let err = harness
        .store
        .index(doc(json!({"_id": "a"})))
        .await
        .unwrap_err();
    assert!(sift_store::SearchStore::is_connection_error(&err));

    let err = harness.store.unindex("a").await.unwrap_err();
    assert!(err.is_connection_error());

    assert!(harness.store.get("a").await.is_none());
}

#[tokio::test]
async fn test_find_by_id_raw_response() {
    let harness = TestHarness::new();
    harness
        .store
        .index(doc(json!({"_id": "a", "name": "Tartine"})))
        .await
        .unwrap();

    let response = harness.store.find_by_id("a").await.unwrap();
    assert!(response.found);
    assert_eq!(response.id, "a");
    assert!(!response.source.unwrap().contains_key("_id"));

    let response = harness.store.find_by_id("b").await.unwrap();
    assert!(!response.found);
}

#[tokio::test]
async fn test_bulk_operations() {
    let harness = TestHarness::new();
    harness
        .store
        .index(doc(json!({"_id": "old", "name": "Closed"})))
        .await
        .unwrap();

    let operations = vec![
        BulkOperation::index(doc(json!({"_id": "a", "name": "Tartine"}))).unwrap(),
        BulkOperation::index(doc(json!({"_id": "b", "name": "Sightglass"}))).unwrap(),
        BulkOperation::update("a", doc(json!({"rating": 5}))),
        BulkOperation::delete("old"),
    ];
    let result = harness.store.bulk(&operations).await.unwrap();

    assert_eq!(result["errors"], false);
    assert_eq!(result["items"].as_array().unwrap().len(), 4);
    assert_eq!(harness.engine.document_count(INDEX), 2);
    assert_eq!(harness.engine.document(INDEX, "a").unwrap()["rating"], 5);

    let Some(RecordedRequest::Bulk { index, doc_type, lines }) = harness.engine.requests().pop()
    else {
        panic!("expected a bulk request last");
    };
    assert_eq!(index, INDEX);
    assert_eq!(doc_type, TYPE);
    assert_eq!(lines.len(), 7);
}

#[test]
fn test_bulk_rejects_non_scalar_identifier() {
    let err = BulkOperation::index(doc(json!({"_id": {"nested": true}}))).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn test_index_administration() {
    let harness = TestHarness::new();
    let store = &harness.store;

    assert!(!store.index_exists().await.unwrap());

    let settings = json!({"settings": {"number_of_shards": 1}});
    store.create_index(Some(settings.clone())).await.unwrap();
    assert!(store.index_exists().await.unwrap());

    // a second creation is rejected by the engine
    let err = store.create_index(None).await.unwrap_err();
    assert!(matches!(err, Error::Engine { status: Some(400), .. }));

    let mapping = json!({"geo": {"type": "geo_point"}, "name": {"type": "text"}});
    store.update_type_mapping(mapping.clone()).await.unwrap();
    assert_eq!(
        harness.engine.mapping(INDEX, TYPE),
        Some(json!({"properties": mapping}))
    );

    store.delete_index().await.unwrap();
    assert!(!store.index_exists().await.unwrap());
}

#[tokio::test]
async fn test_invalid_index_names_never_reach_engine() {
    for name in ["", "Places", "-places", "pla ces", "places*", ".."] {
        let harness = TestHarness::with_config(StoreConfig::new(name, TYPE));

        let err = harness.store.create_index(None).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "accepted {name:?}");
        let err = harness.store.delete_index().await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "accepted {name:?}");

        assert!(harness.engine.requests().is_empty());
    }
}
