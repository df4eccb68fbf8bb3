//! Sort strategies.
//!
//! A [`SortDescriptor`] names one strategy and carries its parameters. The
//! serialized form uses the strategy name as a tag:
//!
//! ```json
//! { "sort_type": "FieldOrder", "sort_params": { "sort_field": "name", "sort_ascending": false } }
//! ```
//!
//! Tags that name no known strategy deserialize to
//! [`SortDescriptor::Unknown`], which sorts nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sift_core::{Error, Result};

use crate::geo::GeoPoint;

/// Geo-point field used by distance sorting when none is given.
pub const DEFAULT_GEO_FIELD: &str = "geo";

/// Sort by a stored field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOrderParams {
    /// Field to order by.
    pub sort_field: String,

    /// Ascending when true (the default), descending otherwise.
    #[serde(default = "default_true")]
    pub sort_ascending: bool,
}

/// Sort by distance from an origin, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceParams {
    /// Origin as a GeoJSON-ordered `[lon, lat]` pair. Without an origin
    /// nothing is sorted.
    #[serde(default)]
    pub origin: Option<[f64; 2]>,

    /// Geo-point field measured from.
    #[serde(default = "default_geo_field")]
    pub geo_field: String,
}

fn default_true() -> bool {
    true
}

fn default_geo_field() -> String {
    DEFAULT_GEO_FIELD.to_string()
}

/// A sort strategy and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sort_type", content = "sort_params")]
pub enum SortDescriptor {
    /// Order by a field's value.
    FieldOrder(FieldOrderParams),
    /// Order by distance from an origin.
    Distance(DistanceParams),
    /// Keep the engine's relevance ordering.
    Scoring,
    /// A strategy tag this version does not know.
    #[serde(other)]
    Unknown,
}

impl SortDescriptor {
    /// Order by `field`, ascending or descending.
    pub fn field_order(field: impl Into<String>, ascending: bool) -> Self {
        SortDescriptor::FieldOrder(FieldOrderParams {
            sort_field: field.into(),
            sort_ascending: ascending,
        })
    }

    /// Order by plane distance from `origin` on the default geo field.
    pub fn distance(origin: GeoPoint) -> Self {
        SortDescriptor::Distance(DistanceParams {
            origin: Some([origin.lon, origin.lat]),
            geo_field: default_geo_field(),
        })
    }

    /// Keep relevance ordering.
    pub fn scoring() -> Self {
        SortDescriptor::Scoring
    }

    /// The sort clause this descriptor contributes, if any.
    ///
    /// `Scoring` contributes nothing since relevance order is the engine's
    /// native order. `Distance` without an origin and `Unknown` contribute
    /// nothing either. `FieldOrder` with an empty field is rejected.
    pub fn to_sort_clause(&self) -> Result<Option<Value>> {
        match self {
            SortDescriptor::FieldOrder(params) => {
                if params.sort_field.is_empty() {
                    return Err(Error::validation_field(
                        "sort_field",
                        "sort_field required for FieldOrder sort",
                    ));
                }
                let direction = if params.sort_ascending { "asc" } else { "desc" };
                Ok(Some(json!({ &params.sort_field: direction })))
            }
            SortDescriptor::Distance(params) => Ok(params.origin.map(|origin| {
                let point = GeoPoint::from_lon_lat(origin);
                json!({
                    "_geo_distance": {
                        &params.geo_field: point,
                        "order": "asc",
                        "unit": "m",
                        "distance_type": "plane",
                    }
                })
            })),
            SortDescriptor::Scoring => Ok(None),
            SortDescriptor::Unknown => {
                log::debug!("Ignoring sort descriptor with unknown sort type");
                Ok(None)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
