//! Hit consolidation.
//!
//! Flattens one raw engine hit into the document shape the application
//! works with:
//!
//! | From the hit | Lands as |
//! |--------------|----------|
//! | `_source` fields | top-level fields |
//! | `_id` | `_id` |
//! | `fields` (computed) | top-level fields |
//! | `sort` | `_sort` |
//! | `_score`, when non-zero | `_score` |
//!
//! Later rows overwrite earlier ones on key collisions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sift_core::{Document, ID_FIELD};

use crate::response::Hit;

/// Key carrying a hit's sort values.
pub const SORT_FIELD: &str = "_sort";

/// Key carrying a hit's relevance score.
pub const SCORE_FIELD: &str = "_score";

/// One page of consolidated hits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Consolidated hits, in engine order.
    pub data: Vec<Document>,

    /// Total matches reported by the engine.
    pub total: u64,
}

/// Flatten one raw hit into an application document.
pub fn consolidate_hit(hit: Hit) -> Document {
    let mut consolidated = hit.source.unwrap_or_default();
    consolidated.insert(ID_FIELD.to_string(), Value::String(hit.id));

    if let Some(fields) = hit.fields {
        consolidated.extend(fields);
    }

    if let Some(sort) = hit.sort {
        consolidated.insert(SORT_FIELD.to_string(), Value::Array(sort));
    }

    if let Some(score) = hit.score.filter(|s| *s != 0.0 && !s.is_nan()) {
        consolidated.insert(SCORE_FIELD.to_string(), Value::from(score));
    }

    consolidated
}

// ============================================================================
// Tests
// ============================================================================
