//! Geographic inputs: points and the computed-distance field.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A latitude/longitude pair, serialized as `{"lat": .., "lon": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a point from a GeoJSON-ordered `[lon, lat]` pair.
    pub fn from_lon_lat([lon, lat]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

/// A script field reporting each hit's distance from a fixed point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceCalculation {
    /// Geo-point field measured from.
    pub geo_field: String,
    /// Latitude of the reference point.
    pub lat: f64,
    /// Longitude of the reference point.
    pub lon: f64,
    /// Name of the computed field on each hit.
    pub distance_field: String,
}

impl DistanceCalculation {
    /// The `script_fields` fragment merged into the compiled document.
    ///
    /// Requires inline scripting to be enabled on the engine.
    pub fn to_script_fields(&self) -> Value {
        json!({
            "script_fields": {
                &self.distance_field: {
                    "params": {
                        "lat": self.lat,
                        "lon": self.lon,
                    },
                    "script": format!("doc['{}'].distance(lat, lon)", self.geo_field),
                }
            }
        })
    }
}
