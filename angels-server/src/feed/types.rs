//! Upstream station feed JSON types.
//!
//! These types map directly to the GeoJSON returned by the station map API.
//! Everything the conversion step needs is optional here so that a missing
//! field turns into a [`MalformedRecord`](super::MalformedRecord) naming the
//! offending record rather than an opaque JSON error.

use serde::Deserialize;

/// Top-level response: a GeoJSON feature collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One station.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Properties,
}

/// Point geometry. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Station properties.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    pub name: Option<String>,

    /// `"give"` or `"take"`; absent when the station is balanced
    #[serde(rename = "bike_angels_action")]
    pub action: Option<String>,

    #[serde(rename = "bike_angels_points")]
    pub points: Option<i64>,
}
