//! The compiled query document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A compiled, immutable query document.
///
/// Shape:
///
/// ```json
/// {
///   "query": { "bool": { "must": <relevance>, "filter": <filter> } },
///   "sort": [ ... ],                 // only when sorts were added
///   "script_fields": { ... },        // only with a distance calculation
///   "min_score": 0.5                 // only with a non-zero floor
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDocument(Value);

impl QueryDocument {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the document as JSON.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the document as JSON.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The relevance expression (`query.bool.must`).
    pub fn relevance(&self) -> &Value {
        &self.0["query"]["bool"]["must"]
    }

    /// The combined filter expression (`query.bool.filter`).
    pub fn filter(&self) -> &Value {
        &self.0["query"]["bool"]["filter"]
    }

    /// The sort list, if any sorts were added.
    pub fn sort(&self) -> Option<&Vec<Value>> {
        self.0.get("sort").and_then(Value::as_array)
    }

    /// The relevance floor, if one was set.
    pub fn min_score(&self) -> Option<f64> {
        self.0.get("min_score").and_then(Value::as_f64)
    }
}

impl From<QueryDocument> for Value {
    fn from(document: QueryDocument) -> Self {
        document.0
    }
}
