use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The immutable snapshot produced by one derivation run.
///
/// This struct is the final output of the `DerivationEngine` and the input
/// to every ranking and aggregation query. It exposes accessors only:
/// recomputing on fresh data builds a new table, so readers of an old
/// snapshot are never disturbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTable {
    /// Channels in input order. Input order is the tie-break order for
    /// rankings, so it is preserved exactly.
    entities: Vec<DerivedChannel>,
    /// Population statistics per analyzed measurement, computed once over
    /// the whole table.
    stats: HashMap<String, MeasurementStats>,
}

impl DerivedTable {
    pub(crate) fn new(
        entities: Vec<DerivedChannel>,
        stats: HashMap<String, MeasurementStats>,
    ) -> Self {
        Self { entities, stats }
    }

    /// All channels, in input order.
    pub fn entities(&self) -> &[DerivedChannel] {
        &self.entities
    }

    /// Looks up a single channel by identity.
    pub fn entity(&self, identity: &str) -> Option<&DerivedChannel> {
        self.entities.iter().find(|e| e.identity == identity)
    }

    /// Population statistics for an analyzed measurement.
    pub fn stats(&self, measurement: &str) -> Option<&MeasurementStats> {
        self.stats.get(measurement)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// One channel row of the derived table: the raw measurements (plus any
/// computed ratio measurements) and the per-measurement derived scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedChannel {
    pub identity: String,
    /// Measurement name -> value. Raw inputs plus ratio measurements.
    pub measurements: HashMap<String, Decimal>,
    /// Analyzed measurement name -> derived scores.
    pub scores: HashMap<String, DerivedScores>,
}

impl DerivedChannel {
    /// Looks up a measurement (raw or ratio) by name.
    pub fn measurement(&self, name: &str) -> Option<Decimal> {
        self.measurements.get(name).copied()
    }

    /// Looks up the derived scores for an analyzed measurement.
    pub fn derived(&self, name: &str) -> Option<&DerivedScores> {
        self.scores.get(name)
    }
}

/// Population statistics for one analyzed measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementStats {
    pub mean: Decimal,
    /// Sample standard deviation (n - 1 divisor), matching the convention
    /// of the upstream data pipeline. Zero when fewer than two channels.
    pub std_dev: Decimal,
}

/// The two derived columns every analyzed measurement contributes per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedScores {
    /// Z-score: (value - mean) / std_dev, or zero when the population has
    /// no dispersion.
    pub normalized_score: Decimal,
    /// Signed percent difference from the population mean, or zero when the
    /// mean itself is zero.
    pub relative_deviation_pct: Decimal,
}
