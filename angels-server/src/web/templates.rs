//! Askama templates for the web frontend.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::domain::{Location, Station};
use crate::ranking::{Candidate, RankedSnapshot};

/// Metres per mile, as the opportunity page rounds it.
pub const METERS_PER_MILE: f64 = 1609.0;

/// Google Maps bicycling directions between two points.
pub fn directions_url(from: &Location, to: &Location) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={:.6},{:.6}&destination={:.6},{:.6}&travelmode=bicycling",
        from.lat(),
        from.lon(),
        to.lat(),
        to.lon()
    )
}

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Ranked opportunities page.
#[derive(Template)]
#[template(path = "opportunities.html")]
pub struct OpportunitiesTemplate {
    pub opportunities: Vec<OpportunityView>,
    pub updated: Option<String>,
}

impl OpportunitiesTemplate {
    /// Build the page for the best `at_most` opportunities of a snapshot.
    pub fn from_snapshot(
        snapshot: &RankedSnapshot,
        at_most: usize,
        computed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            opportunities: snapshot
                .top(at_most)
                .map(|(c, from, to)| OpportunityView::new(c, from, to))
                .collect(),
            updated: computed_at.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
        }
    }
}

/// Station list page.
#[derive(Template)]
#[template(path = "stations.html")]
pub struct StationsTemplate {
    pub stations: Vec<StationView>,
}

impl StationsTemplate {
    /// Build the page from a snapshot's non-neutral stations.
    pub fn from_snapshot(snapshot: &RankedSnapshot) -> Self {
        Self {
            stations: snapshot
                .stations_by_points()
                .into_iter()
                .map(StationView::from_station)
                .collect(),
        }
    }
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One suggested trip.
#[derive(Debug, Clone)]
pub struct OpportunityView {
    pub from_name: String,
    pub from_points: i64,
    pub to_name: String,
    pub to_points: i64,
    pub distance_display: String,
    pub points_per_mile_display: String,
    pub directions_url: String,
}

impl OpportunityView {
    /// Create from a candidate and its two stations.
    pub fn new(candidate: &Candidate, from: &Station, to: &Station) -> Self {
        Self {
            from_name: from.name.clone(),
            from_points: from.points,
            to_name: to.name.clone(),
            to_points: to.points,
            distance_display: format!("{:.0}", candidate.distance_m),
            points_per_mile_display: format!(
                "{:.1}",
                candidate.points_per_meter * METERS_PER_MILE
            ),
            directions_url: directions_url(&from.loc, &to.loc),
        }
    }
}

/// Station row for the station list.
#[derive(Debug, Clone)]
pub struct StationView {
    pub location: String,
    pub name: String,
    pub points: i64,
}

impl StationView {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            location: station.loc.to_string(),
            name: station.name.clone(),
            points: station.points,
        }
    }
}
