//! Conversion from feed JSON types to domain stations.

use crate::domain::{Location, Station};

use super::error::{FeedError, MalformedRecord};
use super::types::{Feature, FeatureCollection};

/// The action tag whose points are negated: riders are asked to bring bikes.
const GIVE_ACTION: &str = "give";

/// Decode a raw snapshot payload and build the station list.
pub fn parse_stations(raw: &str) -> Result<Vec<Station>, FeedError> {
    let collection: FeatureCollection =
        serde_json::from_str(raw).map_err(|e| FeedError::Json {
            message: e.to_string(),
        })?;

    build_stations(&collection).map_err(FeedError::from)
}

/// Build the ordered station list from a decoded feature collection.
///
/// Fails on the first malformed record; there are no partial station lists.
pub fn build_stations(collection: &FeatureCollection) -> Result<Vec<Station>, MalformedRecord> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| convert_feature(index, feature))
        .collect()
}

fn convert_feature(index: usize, feature: &Feature) -> Result<Station, MalformedRecord> {
    let malformed = |reason: String| MalformedRecord { index, reason };

    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| malformed("missing geometry".to_string()))?;

    // GeoJSON order: longitude first.
    let [lon, lat] = geometry.coordinates[..] else {
        return Err(malformed(format!(
            "expected 2 coordinates, got {}",
            geometry.coordinates.len()
        )));
    };

    let loc = Location::new(lat, lon).map_err(|e| malformed(e.to_string()))?;

    let raw_points = feature
        .properties
        .points
        .ok_or_else(|| malformed("missing bike_angels_points".to_string()))?;

    let points = if feature.properties.action.as_deref() == Some(GIVE_ACTION) {
        raw_points.saturating_neg()
    } else {
        raw_points
    };

    let name = feature.properties.name.clone().unwrap_or_default();

    Ok(Station::new(name, points, loc))
}
