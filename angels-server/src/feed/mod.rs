//! Station feed: fetching and decoding the upstream station snapshot.
//!
//! The upstream publishes a GeoJSON feature collection, one feature per
//! station, carrying the Bike Angels action and point value. This module
//! fetches the raw payload (from a local file or the live API) and turns it
//! into validated [`Station`](crate::domain::Station)s.

mod client;
mod convert;
mod error;
mod file;
mod source;
mod types;

pub use client::{HttpSource, HttpSourceConfig};
pub use convert::{build_stations, parse_stations};
pub use error::{FeedError, FetchError, MalformedRecord};
pub use file::FileSource;
pub use source::{FeedSource, SnapshotSource};
pub use types::{Feature, FeatureCollection, Geometry, Properties};
