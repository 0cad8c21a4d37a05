//! Geographic coordinates.

use std::fmt;

use super::distance::distance;

/// Error returned when constructing a location from invalid coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid location ({lat}, {lon}): {reason}")]
pub struct InvalidLocation {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A point on the Earth's surface in decimal degrees.
///
/// Both coordinates are finite and in range by construction.
///
/// # Examples
///
/// ```
/// use angels_server::domain::Location;
///
/// let loc = Location::new(40.7128, -74.006).unwrap();
/// assert_eq!(loc.lat(), 40.7128);
///
/// // Out of range latitudes are rejected
/// assert!(Location::new(91.0, 0.0).is_err());
/// assert!(Location::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    lat: f64,
    lon: f64,
}

impl Location {
    /// Create a location, validating both coordinates.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidLocation> {
        let invalid = |reason| InvalidLocation { lat, lon, reason };

        if !lat.is_finite() || !lon.is_finite() {
            return Err(invalid("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }

        Ok(Self { lat, lon })
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to another location, in metres.
    pub fn distance_to(&self, other: &Location) -> f64 {
        distance(self.lat, self.lon, other.lat, other.lon)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.lat, self.lon)
    }
}
