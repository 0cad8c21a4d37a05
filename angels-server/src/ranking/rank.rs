//! Pairwise candidate generation and scoring.

use crate::domain::Station;

use super::config::{RankConfig, ZeroDistancePolicy};

/// A suggested trip from one station to another.
///
/// Indices refer to the station slice the candidate was ranked from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub from: usize,
    pub to: usize,
    pub distance_m: f64,
    pub points_per_meter: f64,
}

/// Rank every worthwhile trip between the given stations.
///
/// A trip from `i` to `j` qualifies when it gains points
/// (`points[i] - points[j] > 0`) and the two stations are not on the same
/// side of zero: surplus to deficit, surplus to neutral, or neutral to
/// deficit.
///
/// The result is sorted by descending points per metre. The sort is stable,
/// so ties keep their enumeration order.
pub fn rank(stations: &[Station], config: &RankConfig) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (i, from) in stations.iter().enumerate() {
        for (j, to) in stations.iter().enumerate() {
            if i == j || !qualifies(from, to) {
                continue;
            }

            let gain = from.points.abs_diff(to.points) as f64;
            let distance_m = from.loc.distance_to(&to.loc);

            let points_per_meter = if distance_m > 0.0 {
                gain / distance_m
            } else {
                match config.zero_distance {
                    ZeroDistancePolicy::RankFirst => f64::INFINITY,
                    ZeroDistancePolicy::Exclude => continue,
                }
            };

            candidates.push(Candidate {
                from: i,
                to: j,
                distance_m,
                points_per_meter,
            });
        }
    }

    candidates.sort_by(|a, b| b.points_per_meter.total_cmp(&a.points_per_meter));
    candidates
}

/// Whether a trip between the two stations earns anything.
fn qualifies(from: &Station, to: &Station) -> bool {
    // Two surplus or two deficit stations never pair up.
    let same_side = (from.has_surplus() && to.has_surplus())
        || (from.has_deficit() && to.has_deficit());
    from.points > to.points && !same_side
}

/// The stations of one snapshot together with their ranked candidates.
///
/// This is what the cache holds and shares with request handlers.
#[derive(Debug, Clone, Default)]
pub struct RankedSnapshot {
    stations: Vec<Station>,
    candidates: Vec<Candidate>,
}

impl RankedSnapshot {
    /// Rank the given stations.
    pub fn new(stations: Vec<Station>, config: &RankConfig) -> Self {
        let candidates = rank(&stations, config);
        Self {
            stations,
            candidates,
        }
    }

    /// All stations, in feed order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// All candidates, best first.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// The best `at_most` candidates with their origin and destination stations.
    pub fn top(&self, at_most: usize) -> impl Iterator<Item = (&Candidate, &Station, &Station)> {
        self.candidates
            .iter()
            .take(at_most)
            .filter_map(|c| Some((c, self.stations.get(c.from)?, self.stations.get(c.to)?)))
    }

    /// Stations with non-zero points, most in need of bikes first.
    pub fn stations_by_points(&self) -> Vec<&Station> {
        let mut stations: Vec<&Station> =
            self.stations.iter().filter(|s| s.points != 0).collect();
        stations.sort_by_key(|s| s.points);
        stations
    }
}
