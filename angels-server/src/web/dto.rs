//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Station;
use crate::ranking::Candidate;

use super::templates::METERS_PER_MILE;

/// Query parameters for the opportunity endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct OpportunitiesQuery {
    /// Number of opportunities to return (defaults to the server setting)
    pub at_most: Option<usize>,
}

/// Ranked opportunities response.
#[derive(Debug, Serialize)]
pub struct OpportunitiesResponse {
    /// When the underlying snapshot was computed (RFC 3339)
    pub computed_at: String,

    /// Opportunities, best first
    pub opportunities: Vec<OpportunityResult>,
}

/// A suggested trip.
#[derive(Debug, Serialize)]
pub struct OpportunityResult {
    pub from: StationResult,
    pub to: StationResult,

    /// Straight-line distance in metres
    pub distance_m: f64,

    /// Points earned per metre ridden (null when the stations coincide)
    pub points_per_meter: f64,

    /// Points earned per mile ridden (null when the stations coincide)
    pub points_per_mile: f64,
}

impl OpportunityResult {
    /// Create from a candidate and its two stations.
    pub fn new(candidate: &Candidate, from: &Station, to: &Station) -> Self {
        Self {
            from: StationResult::from_station(from),
            to: StationResult::from_station(to),
            distance_m: candidate.distance_m,
            points_per_meter: candidate.points_per_meter,
            points_per_mile: candidate.points_per_meter * METERS_PER_MILE,
        }
    }
}

/// A station in responses.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,
    pub points: i64,
    pub lat: f64,
    pub lon: f64,
}

impl StationResult {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            name: station.name.clone(),
            points: station.points,
            lat: station.loc.lat(),
            lon: station.loc.lon(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
