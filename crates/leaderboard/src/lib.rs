//! Ordered pillar leaderboards over a derived snapshot.
//!
//! Ranking never mutates the snapshot: every query is a pure function of
//! the table, a pillar definition, and an explicit sort mode. Ties are
//! broken by input order (stable sort) so equal values rank
//! deterministically, and tied channels share a competition-style rank.

use analytics::DerivedTable;
use configuration::PillarDefinition;
use core_types::SortMode;
use rust_decimal::Decimal;
use serde::Serialize;

pub mod error;

pub use error::LeaderboardError;

/// One row of an ordered pillar leaderboard.
///
/// The displayed numbers (raw metric, normalized score, percent deviation)
/// are always the channel's own derived fields; the sort mode only decides
/// the order they appear in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub identity: String,
    /// The value of the column that drove the ordering.
    pub sort_value: Decimal,
    /// The pillar's raw metric value, independent of sort mode.
    pub metric_value: Decimal,
    pub normalized_score: Decimal,
    pub relative_deviation_pct: Decimal,
    /// 1-based rank; channels with equal sort values share one.
    pub rank: usize,
}

/// A full ordering of the table for one (pillar, sort mode) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pillar_key: String,
    sort_mode: SortMode,
    rows: Vec<RankedRow>,
}

impl Ranking {
    /// The ranked rows, strictly descending by the chosen column.
    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    pub fn total_count(&self) -> usize {
        self.rows.len()
    }

    pub fn pillar_key(&self) -> &str {
        &self.pillar_key
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }
}

/// A channel's position within a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// 1-based rank position.
    pub rank_position: usize,
    /// Number of channels in the ranking.
    pub total_count: usize,
}

/// Orders the whole table for one pillar, descending by the chosen column.
pub fn rank(
    table: &DerivedTable,
    pillar: &PillarDefinition,
    sort_mode: SortMode,
) -> Result<Ranking, LeaderboardError> {
    if table.is_empty() {
        return Err(LeaderboardError::EmptyTable);
    }

    let mut rows = Vec::with_capacity(table.len());
    for entity in table.entities() {
        let metric_value = entity
            .measurement(&pillar.metric)
            .ok_or_else(|| LeaderboardError::MissingMeasurement(pillar.metric.clone()))?;
        let derived = entity
            .derived(&pillar.metric)
            .ok_or_else(|| LeaderboardError::MissingMeasurement(pillar.metric.clone()))?;

        let sort_value = match sort_mode {
            SortMode::RawMetric => metric_value,
            SortMode::NormalizedScore => derived.normalized_score,
        };

        rows.push(RankedRow {
            identity: entity.identity.clone(),
            sort_value,
            metric_value,
            normalized_score: derived.normalized_score,
            relative_deviation_pct: derived.relative_deviation_pct,
            rank: 0,
        });
    }

    // Stable descending sort: equal sort values keep their input order.
    rows.sort_by(|a, b| b.sort_value.cmp(&a.sort_value));

    // Competition-style rank assignment: equal sort values share a rank, so
    // an all-tied table puts everyone at rank 1.
    let mut previous: Option<Decimal> = None;
    let mut current_rank = 0;
    for (index, row) in rows.iter_mut().enumerate() {
        if previous != Some(row.sort_value) {
            current_rank = index + 1;
            previous = Some(row.sort_value);
        }
        row.rank = current_rank;
    }

    tracing::debug!(
        pillar = %pillar.key,
        mode = ?sort_mode,
        rows = rows.len(),
        "Ranked pillar leaderboard"
    );

    Ok(Ranking {
        pillar_key: pillar.key.clone(),
        sort_mode,
        rows,
    })
}

/// Finds a channel's position within a ranking.
pub fn locate(ranking: &Ranking, identity: &str) -> Result<Placement, LeaderboardError> {
    let row = ranking
        .rows
        .iter()
        .find(|r| r.identity == identity)
        .ok_or_else(|| LeaderboardError::EntityNotFound(identity.to_string()))?;

    Ok(Placement {
        rank_position: row.rank,
        total_count: ranking.rows.len(),
    })
}
