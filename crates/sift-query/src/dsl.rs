//! Stateless expression helpers.
//!
//! Each function returns one fragment of a query document. `QueryBuilder`
//! assembles these; they are public so callers can hand-build fragments for
//! the few cases the builder does not cover.

use serde::{Serialize, Serializer};
use serde_json::{Value, json};

/// Fuzziness applied by fuzzy text matches.
pub const DEFAULT_FUZZINESS: Fuzziness = Fuzziness::Auto;

/// Fuzziness applied by exact text matches.
pub const NO_FUZZINESS: Fuzziness = Fuzziness::Edits(0);

/// Number of leading characters that must match exactly in a fuzzy match.
pub const FUZZY_PREFIX_LENGTH: u32 = 1;

/// Allowed edit distance for a text match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// Let the engine pick the edit distance from the term length.
    Auto,
    /// Fixed maximum edit distance.
    Edits(u8),
}

impl Serialize for Fuzziness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fuzziness::Auto => serializer.serialize_str("AUTO"),
            Fuzziness::Edits(n) => serializer.serialize_u8(*n),
        }
    }
}

impl From<Fuzziness> for Value {
    fn from(fuzziness: Fuzziness) -> Self {
        match fuzziness {
            Fuzziness::Auto => Value::from("AUTO"),
            Fuzziness::Edits(n) => Value::from(n),
        }
    }
}

/// Single-value equality test: `{"term": {path: value}}`.
pub fn term_query(path: &str, value: impl Into<Value>) -> Value {
    let value: Value = value.into();
    json!({ "term": { path: value } })
}

/// Multi-value set membership: `{"terms": {path: [values]}}`.
pub fn terms_query<I, V>(path: &str, values: I) -> Value
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    json!({ "terms": { path: values } })
}

/// Boolean OR of one `term` test per value.
///
/// Matches the same documents as [`terms_query`], but as independent
/// clauses instead of a single multi-value operator.
pub fn matches_one_bool_query<I, V>(path: &str, values: I) -> Value
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let terms: Vec<Value> = values
        .into_iter()
        .map(|value| term_query(path, value))
        .collect();
    bool_should(terms)
}

/// Matches every document.
pub fn match_all_query() -> Value {
    json!({ "match_all": {} })
}

/// Text match against one field with a boost and fuzziness.
pub fn single_field_text_query_with_boost(
    field: &str,
    text: &str,
    boost: f64,
    fuzziness: Fuzziness,
) -> Value {
    json!({
        "match": {
            field: {
                "query": text,
                "boost": boost,
                "fuzziness": fuzziness,
                "prefix_length": FUZZY_PREFIX_LENGTH,
            }
        }
    })
}

/// Prefix match against one field.
pub fn prefix_match(field: &str, prefix: &str, boost: f64) -> Value {
    json!({
        "prefix": {
            field: {
                "value": prefix,
                "boost": boost,
            }
        }
    })
}

/// Whole-phrase match against one field.
pub fn phrase_match(field: &str, text: &str, boost: f64) -> Value {
    json!({
        "match_phrase": {
            field: {
                "query": text,
                "boost": boost,
            }
        }
    })
}

/// Text match across several fields sharing one fuzziness.
pub fn multi_match<I, S>(fields: I, text: &str, fuzziness: Fuzziness) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    json!({
        "multi_match": {
            "fields": fields,
            "query": text,
            "fuzziness": fuzziness,
        }
    })
}

/// Combine filters with AND semantics.
pub fn and_filters(filters: &[Value]) -> Value {
    bool_must(filters.to_vec())
}

/// Whether `text` holds more than one token.
///
/// Any whitespace counts as a separator, including leading or trailing
/// whitespace.
pub fn is_phrase(text: &str) -> bool {
    !text.is_empty() && text.contains(char::is_whitespace)
}

/// `{"bool": {"should": subqueries}}`
pub fn bool_should(subqueries: Vec<Value>) -> Value {
    json!({ "bool": { "should": subqueries } })
}

/// `{"bool": {"must": subqueries}}`
pub fn bool_must(subqueries: Vec<Value>) -> Value {
    json!({ "bool": { "must": subqueries } })
}

// ============================================================================
// Tests
// ============================================================================
