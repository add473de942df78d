//! # Vantage
//!
//! A channel competitive-analytics engine: it ingests a static table of
//! per-channel performance records and answers the comparative queries a
//! dashboard renders: pillar leaderboards under a raw/normalized toggle,
//! the selected channel's standing within each pillar, and share-of-total
//! breakdowns.
//!
//! ## Architectural Principles
//!
//! - **One-way data flow:** raw records are derived once into an immutable
//!   `Snapshot`; ranking and aggregation queries only ever read it.
//! - **Shareable snapshots:** a `Snapshot` is cheap to clone (the derived
//!   table sits behind an `Arc`), so concurrent sessions can query the same
//!   snapshot with no coordination. Fresh data builds a fresh snapshot;
//!   in-flight readers of the old one are unaffected.
//! - **No ambient state:** the sort-mode toggle and the selected channel are
//!   explicit query parameters, never engine state.
//!
//! ## Public API
//!
//! - `Snapshot`: derives and owns the immutable table, answers queries.
//! - `PillarView`: the per-(pillar, sort mode, selection) fact bundle a
//!   presentation layer renders.
//! - `VantageError`: the error union across the underlying stages.

use aggregation::{AggregationError, Breakdown, Highlight};
use analytics::{DerivationEngine, DerivationError, DerivedTable};
use configuration::error::ConfigError;
use configuration::{PillarDefinition, Registry};
use core_types::{ChannelRecord, SortMode};
use leaderboard::{LeaderboardError, RankedRow};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VantageError {
    #[error("Registry error: {0}")]
    Config(#[from] ConfigError),

    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Ranking error: {0}")]
    Leaderboard(#[from] LeaderboardError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Unknown pillar key: '{0}'")]
    UnknownPillar(String),
}

/// An immutable snapshot of one derived table plus the registry that shaped
/// it.
///
/// Cloning shares the underlying table; rebuilding on refreshed data
/// produces a new, independent snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    table: Arc<DerivedTable>,
    registry: Registry,
}

impl Snapshot {
    /// Validates the registry, derives the table once, and wraps it for
    /// sharing. This is the only place derivation happens; every later
    /// query is a pure read.
    pub fn build(channels: &[ChannelRecord], registry: Registry) -> Result<Self, VantageError> {
        registry.validate()?;
        let table = DerivationEngine::new().derive(channels, &registry)?;

        tracing::info!(
            channels = table.len(),
            pillars = registry.pillars.len(),
            "Built derived snapshot"
        );

        Ok(Self {
            table: Arc::new(table),
            registry,
        })
    }

    /// The derived table underlying this snapshot.
    pub fn table(&self) -> &DerivedTable {
        &self.table
    }

    /// The registry this snapshot was derived with.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Answers one dashboard query: everything the presentation layer needs
    /// to render a pillar for a selected channel under a given sort mode.
    pub fn pillar_view(
        &self,
        pillar_key: &str,
        sort_mode: SortMode,
        selected_identity: &str,
    ) -> Result<PillarView, VantageError> {
        let pillar = self
            .registry
            .pillar(pillar_key)
            .ok_or_else(|| VantageError::UnknownPillar(pillar_key.to_string()))?;

        let ranking = leaderboard::rank(&self.table, pillar, sort_mode)?;
        let placement = leaderboard::locate(&ranking, selected_identity)?;
        let breakdown = aggregation::aggregate(&self.table, &pillar.aggregate)?;

        // The selected channel's displayed numbers come from its own derived
        // fields; the sort mode only decided the ordering above.
        let entity = self
            .table
            .entity(selected_identity)
            .ok_or_else(|| LeaderboardError::EntityNotFound(selected_identity.to_string()))?;
        let metric_value = entity
            .measurement(&pillar.metric)
            .ok_or_else(|| LeaderboardError::MissingMeasurement(pillar.metric.clone()))?;
        let derived = entity
            .derived(&pillar.metric)
            .ok_or_else(|| LeaderboardError::MissingMeasurement(pillar.metric.clone()))?;

        Ok(PillarView {
            pillar_key: pillar.key.clone(),
            label: pillar.label.clone(),
            sort_mode,
            selected: SelectedChannel {
                identity: entity.identity.clone(),
                metric_value,
                normalized_score: derived.normalized_score,
                relative_deviation_pct: derived.relative_deviation_pct,
                rank_position: placement.rank_position,
                total_count: placement.total_count,
            },
            rows: ranking.rows().to_vec(),
            breakdown,
        })
    }

    /// The selected/rest partition for presentation styling.
    pub fn highlight(&self, identity: &str) -> Result<Highlight<'_>, VantageError> {
        Ok(aggregation::highlight(&self.table, identity)?)
    }

    /// The definition backing a pillar key, if the registry declares it.
    pub fn pillar(&self, key: &str) -> Option<&PillarDefinition> {
        self.registry.pillar(key)
    }
}

/// Everything a presentation layer needs to render one pillar card for one
/// selected channel: the KPI numbers, the standing, the full leaderboard,
/// and the share-of-total breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarView {
    pub pillar_key: String,
    /// Opaque display label from the registry.
    pub label: String,
    pub sort_mode: SortMode,
    pub selected: SelectedChannel,
    /// The full leaderboard, descending by the chosen column.
    pub rows: Vec<RankedRow>,
    /// Totals and per-channel shares for the pillar's aggregate measurement.
    pub breakdown: Breakdown,
}

/// The selected channel's standing within one pillar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedChannel {
    pub identity: String,
    pub metric_value: Decimal,
    pub normalized_score: Decimal,
    pub relative_deviation_pct: Decimal,
    /// 1-based rank; tied channels share one.
    pub rank_position: usize,
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::RatioDefinition;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    /// The shipped four-pillar registry, inline.
    fn registry() -> Registry {
        let pillar = |key: &str, label: &str, metric: &str, aggregate: &str| PillarDefinition {
            key: key.to_string(),
            label: label.to_string(),
            metric: metric.to_string(),
            aggregate: aggregate.to_string(),
        };
        Registry {
            pillars: vec![
                pillar("reach", "REACH", "subs_per_month", "total_views"),
                pillar("efficiency", "EFFICIENCY", "subs_per_minute", "total_minutes"),
                pillar("engagement", "ENGAGEMENT", "comments_per_minute", "likes"),
                pillar("activity", "ACTIVITY", "videos_per_month", "total_videos"),
            ],
            ratios: vec![RatioDefinition {
                name: "engagement_ratio".to_string(),
                numerators: vec!["likes".to_string(), "comments".to_string()],
                denominator: "total_views".to_string(),
            }],
        }
    }

    fn channel(identity: &str, scale: Decimal) -> ChannelRecord {
        ChannelRecord {
            identity: identity.to_string(),
            measurements: HashMap::from([
                ("subs_per_month".to_string(), dec!(10) * scale),
                ("subs_per_minute".to_string(), dec!(2) * scale),
                ("comments_per_minute".to_string(), dec!(1) * scale),
                ("videos_per_month".to_string(), dec!(4) * scale),
                ("total_views".to_string(), dec!(1000) * scale),
                ("total_minutes".to_string(), dec!(500) * scale),
                ("total_videos".to_string(), dec!(40) * scale),
                ("likes".to_string(), dec!(60) * scale),
                ("comments".to_string(), dec!(30) * scale),
            ]),
        }
    }

    fn snapshot() -> Snapshot {
        let channels = vec![
            channel("A", dec!(1)),
            channel("B", dec!(2)),
            channel("C", dec!(3)),
        ];
        Snapshot::build(&channels, registry()).unwrap()
    }

    #[test]
    fn pillar_view_bundles_standing_ranking_and_breakdown() {
        let view = snapshot()
            .pillar_view("reach", SortMode::RawMetric, "B")
            .unwrap();

        assert_eq!(view.label, "REACH");
        assert_eq!(view.selected.identity, "B");
        assert_eq!(view.selected.metric_value, dec!(20));
        assert_eq!(view.selected.rank_position, 2);
        assert_eq!(view.selected.total_count, 3);
        assert_eq!(view.selected.relative_deviation_pct, dec!(0));

        let order: Vec<&str> = view.rows.iter().map(|r| r.identity.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);

        assert_eq!(view.breakdown.total, dec!(6000));
        assert_eq!(view.breakdown.share_of("C"), Some(dec!(0.5)));
    }

    #[test]
    fn selected_numbers_are_identical_under_both_sort_modes() {
        let snapshot = snapshot();
        let raw = snapshot
            .pillar_view("activity", SortMode::RawMetric, "A")
            .unwrap();
        let normalized = snapshot
            .pillar_view("activity", SortMode::NormalizedScore, "A")
            .unwrap();

        assert_eq!(raw.selected, normalized.selected);
    }

    #[test]
    fn ratio_backed_pillar_is_queryable() {
        // Rank on the engagement ratio itself rather than a raw column.
        let mut registry = registry();
        registry.pillars.push(PillarDefinition {
            key: "resonance".to_string(),
            label: "RESONANCE".to_string(),
            metric: "engagement_ratio".to_string(),
            aggregate: "likes".to_string(),
        });

        let channels = vec![
            channel("A", dec!(1)),
            channel("B", dec!(2)),
            channel("C", dec!(3)),
        ];
        let snapshot = Snapshot::build(&channels, registry).unwrap();
        let view = snapshot
            .pillar_view("resonance", SortMode::NormalizedScore, "A")
            .unwrap();

        // Every channel here has the same (likes + comments) / views ratio,
        // so the population has no dispersion and everyone ties at rank 1.
        assert_eq!(view.selected.normalized_score, dec!(0));
        assert_eq!(view.selected.rank_position, 1);
    }

    #[test]
    fn unknown_pillar_key_is_an_error() {
        assert!(matches!(
            snapshot().pillar_view("virality", SortMode::RawMetric, "A"),
            Err(VantageError::UnknownPillar(key)) if key == "virality"
        ));
    }

    #[test]
    fn unknown_selection_is_an_error() {
        assert!(matches!(
            snapshot().pillar_view("reach", SortMode::RawMetric, "nobody"),
            Err(VantageError::Leaderboard(LeaderboardError::EntityNotFound(_)))
        ));
    }

    #[test]
    fn clones_share_one_derived_table() {
        let snapshot = snapshot();
        let clone = snapshot.clone();
        assert!(Arc::ptr_eq(&snapshot.table, &clone.table));
    }

    #[test]
    fn rebuilding_leaves_old_snapshot_untouched() {
        let old = snapshot();
        let old_view = old.pillar_view("reach", SortMode::RawMetric, "A").unwrap();

        let refreshed = Snapshot::build(
            &[channel("A", dec!(1)), channel("D", dec!(5))],
            registry(),
        )
        .unwrap();

        // The old snapshot still answers from its own table.
        let again = old.pillar_view("reach", SortMode::RawMetric, "A").unwrap();
        assert_eq!(old_view, again);
        assert_eq!(refreshed.table().len(), 2);
    }

    #[test]
    fn highlight_partition_preserves_order() {
        let snapshot = snapshot();
        let split = snapshot.highlight("B").unwrap();

        assert_eq!(split.selected.identity, "B");
        let rest: Vec<&str> = split.rest.iter().map(|e| e.identity.as_str()).collect();
        assert_eq!(rest, vec!["A", "C"]);
    }

    #[test]
    fn pillar_view_serializes_for_the_presentation_layer() {
        let view = snapshot()
            .pillar_view("reach", SortMode::NormalizedScore, "C")
            .unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["pillar_key"], "reach");
        assert_eq!(json["selected"]["identity"], "C");
        assert!(json["rows"].as_array().unwrap().len() == 3);
        assert!(json["breakdown"]["shares"].is_object());
    }
}
