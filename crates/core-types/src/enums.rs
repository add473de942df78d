use serde::{Deserialize, Serialize};

/// Which column drives the ordering of a pillar leaderboard.
///
/// The raw/normalized toggle is an explicit query parameter rather than
/// ambient state: every ranking query names the mode it wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Order by the pillar's raw metric value.
    RawMetric,
    /// Order by the pillar's normalized score (z-score).
    NormalizedScore,
}

impl SortMode {
    /// Returns the other mode of the pair.
    pub fn toggled(&self) -> Self {
        match self {
            SortMode::RawMetric => SortMode::NormalizedScore,
            SortMode::NormalizedScore => SortMode::RawMetric,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_flips_between_modes() {
        assert_eq!(SortMode::RawMetric.toggled(), SortMode::NormalizedScore);
        assert_eq!(SortMode::NormalizedScore.toggled(), SortMode::RawMetric);
    }
}
