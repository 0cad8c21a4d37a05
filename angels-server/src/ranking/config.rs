//! Ranking configuration.

/// Default number of opportunities shown.
pub const DEFAULT_AT_MOST: usize = 10;

/// What to do with a candidate whose stations share a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroDistancePolicy {
    /// Score as infinitely efficient, so it sorts ahead of everything else.
    #[default]
    RankFirst,
    /// Drop the candidate.
    Exclude,
}

/// Configuration for ranking.
#[derive(Debug, Clone, Default)]
pub struct RankConfig {
    /// Handling of zero-distance pairs.
    pub zero_distance: ZeroDistancePolicy,
}

impl RankConfig {
    /// Set the zero-distance policy.
    pub fn with_zero_distance(mut self, policy: ZeroDistancePolicy) -> Self {
        self.zero_distance = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RankConfig::default();
        assert_eq!(config.zero_distance, ZeroDistancePolicy::RankFirst);
        assert_eq!(DEFAULT_AT_MOST, 10);
    }

    #[test]
    fn with_zero_distance() {
        let config = RankConfig::default().with_zero_distance(ZeroDistancePolicy::Exclude);
        assert_eq!(config.zero_distance, ZeroDistancePolicy::Exclude);
    }
}
