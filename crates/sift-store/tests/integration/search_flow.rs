//! Integration tests for searches compiled with `sift-query`.

use serde_json::json;
use sift_query::{BoostMap, GeoPoint, QueryBuilder, SortDescriptor, TextSearchOptions};
use sift_store::{SCORE_FIELD, SORT_FIELD, SearchQuery};

use crate::common::{TestHarness, doc};

fn cafes_near_mission() -> QueryBuilder {
    let boosts = BoostMap::from([("name", 3.0), ("description", 1.0)]);
    let origin = GeoPoint::new(37.76, -122.42);

    QueryBuilder::new()
        .multi_field_text_search_with_boost("pour over", &boosts, &TextSearchOptions::default())
        .filter_terms("kind", ["cafe", "roastery"])
        .filter_by_distance("geo", origin, 2_000.0)
        .add_distance_calculation("geo", origin.lat, origin.lon, "distance")
        .sort_by(&SortDescriptor::distance(origin))
        .unwrap()
}

#[tokio::test]
async fn test_compiled_document_is_sent_verbatim() {
    let harness = TestHarness::new();
    let document = cafes_near_mission().build();

    harness
        .store
        .raw_search(SearchQuery::new(document.clone()).with_size(25))
        .await
        .unwrap();

    let request = &harness.searches()[0];
    assert_eq!(&request.body, document.as_value());
    assert_eq!(request.size, 25);
    assert_eq!(request.from, Some(0));
    assert!(request.body.get("script_fields").is_some());
    assert_eq!(request.body["sort"][0]["_geo_distance"]["unit"], "m");
}

#[tokio::test]
async fn test_search_consolidates_hits() {
    let harness = TestHarness::new();
    harness.engine.push_search_response(json!({
        "hits": {
            "total": 41,
            "hits": [
                {
                    "_id": "sightglass",
                    "_score": null,
                    "_source": {"name": "Sightglass", "kind": "roastery"},
                    "fields": {"distance": [812.4]},
                    "sort": [812.4]
                },
                {
                    "_id": "four-barrel",
                    "_score": null,
                    "_source": {"name": "Four Barrel", "kind": "cafe"},
                    "fields": {"distance": [1304.9]},
                    "sort": [1304.9]
                }
            ]
        }
    }));

    let page = harness
        .store
        .search(SearchQuery::new(cafes_near_mission().build()))
        .await
        .unwrap();

    assert_eq!(page.total, 41);
    assert_eq!(page.data.len(), 2);

    let first = &page.data[0];
    assert_eq!(first["_id"], "sightglass");
    assert_eq!(first["name"], "Sightglass");
    assert_eq!(first["distance"], json!([812.4]));
    assert_eq!(first[SORT_FIELD], json!([812.4]));
    assert!(!first.contains_key(SCORE_FIELD));
    assert_eq!(page.data[1]["_id"], "four-barrel");
}

#[tokio::test]
async fn test_relevance_scores_are_kept() {
    let harness = TestHarness::new();
    harness.engine.push_search_response(json!({
        "hits": {"total": {"value": 1, "relation": "eq"}, "hits": [
            {"_id": "a", "_score": 2.75, "_source": {"name": "Ritual"}}
        ]}
    }));

    let document = QueryBuilder::new()
        .fuzzy_text_query("ritual", ["name"])
        .set_min_score(0.5)
        .build();
    let page = harness.store.search(SearchQuery::new(document)).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0][SCORE_FIELD], 2.75);
}

#[tokio::test]
async fn test_paging_over_stored_documents() {
    let harness = TestHarness::new();
    for n in 0..5 {
        harness
            .store
            .index(doc(json!({"_id": format!("p{n}"), "n": n})))
            .await
            .unwrap();
    }

    let page = harness
        .store
        .search(
            SearchQuery::new(QueryBuilder::new().build())
                .with_from(2)
                .with_size(2),
        )
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    let ids: Vec<_> = page.data.iter().map(|d| d["_id"].clone()).collect();
    assert_eq!(ids, vec![json!("p2"), json!("p3")]);
    assert!(page.data.iter().all(|d| d[SCORE_FIELD] == 1.0));
}

#[tokio::test]
async fn test_engine_failure_surfaces() {
    let harness = TestHarness::new();
    harness.engine.fail_with_connection_error();

    let err = harness
        .store
        .search(SearchQuery::new(QueryBuilder::new().build()))
        .await
        .unwrap_err();
    assert!(err.is_connection_error());
}
