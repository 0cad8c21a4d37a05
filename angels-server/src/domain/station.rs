//! Bike-share stations.

use std::fmt;

use super::location::Location;

/// A bike-share station with its signed rebalancing points.
///
/// Positive points mean the station has surplus bikes, so riders earn points
/// for taking one away. Negative points mean the station needs bikes.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub points: i64,
    pub loc: Location,
}

impl Station {
    /// Create a new station.
    pub fn new(name: impl Into<String>, points: i64, loc: Location) -> Self {
        Self {
            name: name.into(),
            points,
            loc,
        }
    }

    /// Whether the station has surplus bikes to give away.
    pub fn has_surplus(&self) -> bool {
        self.points > 0
    }

    /// Whether the station is short of bikes.
    pub fn has_deficit(&self) -> bool {
        self.points < 0
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:>45} {:>2}", self.loc, self.name, self.points)
    }
}
