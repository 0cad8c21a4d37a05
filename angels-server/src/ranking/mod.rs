//! Opportunity ranking.
//!
//! Pairs up stations with surplus bikes and stations that need bikes, and
//! scores each suggested trip by the points it earns per metre ridden.

mod config;
mod rank;

pub use config::{DEFAULT_AT_MOST, RankConfig, ZeroDistancePolicy};
pub use rank::{Candidate, RankedSnapshot, rank};
