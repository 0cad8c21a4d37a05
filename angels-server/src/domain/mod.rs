//! Domain types for the Bike Angels opportunity finder.
//!
//! Stations and their locations are validated at construction time, so
//! code that receives these types can trust their coordinates.

mod distance;
mod location;
mod station;

pub use distance::{EARTH_RADIUS_M, distance};
pub use location::{InvalidLocation, Location};
pub use station::Station;
