//! Typed view of search and scroll responses.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sift_core::{Document, Error, Result};

/// A search or scroll response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Cursor token for the next scroll round, when a scroll is open.
    #[serde(rename = "_scroll_id", default)]
    pub scroll_id: Option<String>,

    /// Matched documents.
    #[serde(default)]
    pub hits: Hits,
}

impl SearchResponse {
    /// Parse a raw engine response.
    pub fn from_value(raw: Value) -> Result<Self> {
        serde_json::from_value(raw)
            .map_err(|e| Error::malformed(format!("Unexpected search response: {e}")))
    }
}

/// The `hits` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hits {
    /// Total matches reported by the engine, if reported.
    #[serde(default, deserialize_with = "deserialize_total")]
    pub total: Option<u64>,

    /// This page (or batch) of hits.
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One matched document as returned by the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Hit {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Stored fields (absent when the query asked for none).
    #[serde(rename = "_source", default)]
    pub source: Option<Document>,

    /// Engine-computed fields (script fields).
    #[serde(default)]
    pub fields: Option<Document>,

    /// Sort key values for this hit, when the query sorted.
    #[serde(default)]
    pub sort: Option<Vec<Value>>,

    /// Relevance score (null when sorting by something else).
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
}

/// `hits.total` is a plain number on older engines and
/// `{"value": n, "relation": ".."}` on newer ones.
fn deserialize_total<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Total {
        Count(u64),
        Object { value: u64 },
    }

    Ok(Option::<Total>::deserialize(deserializer)?.map(|total| match total {
        Total::Count(n) | Total::Object { value: n } => n,
    }))
}

// ============================================================================
// Tests
// ============================================================================
