use crate::error::DerivationError;
use crate::table::{DerivedChannel, DerivedScores, DerivedTable, MeasurementStats};
use configuration::settings::{RatioDefinition, Registry};
use core_types::ChannelRecord;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// A stateless calculator that turns raw channel records into a derived
/// snapshot table.
#[derive(Debug, Default)]
pub struct DerivationEngine {}

impl DerivationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for deriving a snapshot table.
    ///
    /// # Arguments
    ///
    /// * `channels` - The raw input table, one record per channel.
    /// * `registry` - The pillar registry naming which measurements to analyze.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `DerivedTable` or a `DerivationError`. The
    /// input slice is never mutated; structural failures abort the whole
    /// derivation so a partial table can never escape.
    pub fn derive(
        &self,
        channels: &[ChannelRecord],
        registry: &Registry,
    ) -> Result<DerivedTable, DerivationError> {
        self.check_identities(channels)?;

        if channels.is_empty() {
            // Nothing to analyze. Emptiness surfaces as a query-time error,
            // not a derivation failure.
            tracing::debug!("Deriving snapshot over an empty channel table");
            return Ok(DerivedTable::new(Vec::new(), HashMap::new()));
        }

        tracing::debug!(
            channels = channels.len(),
            pillars = registry.pillars.len(),
            ratios = registry.ratios.len(),
            "Deriving snapshot table"
        );

        let mut entities: Vec<DerivedChannel> = channels
            .iter()
            .map(|record| DerivedChannel {
                identity: record.identity.clone(),
                measurements: record.measurements.clone(),
                scores: HashMap::new(),
            })
            .collect();

        // Ratio measurements are computed before any normalization so they
        // can be analyzed exactly like raw pillar metrics.
        for ratio in &registry.ratios {
            for entity in &mut entities {
                let value = ratio_value(entity, ratio)?;
                entity.measurements.insert(ratio.name.clone(), value);
            }
        }

        // Every pillar's aggregate measurement must exist in every channel,
        // even though no scores are derived from it.
        for pillar in &registry.pillars {
            for entity in &entities {
                if !entity.measurements.contains_key(&pillar.aggregate) {
                    return Err(DerivationError::MissingMeasurement {
                        measurement: pillar.aggregate.clone(),
                        identity: entity.identity.clone(),
                    });
                }
            }
        }

        // Population statistics and per-channel scores, one analyzed
        // measurement at a time.
        let mut stats = HashMap::new();
        for name in registry.analyzed_measurements() {
            let values = column_values(&entities, name)?;
            let measurement_stats = self.calculate_stats(&values)?;

            for (entity, value) in entities.iter_mut().zip(values.iter()) {
                entity.scores.insert(
                    name.to_string(),
                    self.calculate_scores(*value, &measurement_stats),
                );
            }
            stats.insert(name.to_string(), measurement_stats);
        }

        Ok(DerivedTable::new(entities, stats))
    }

    /// Rejects tables where two channels share an identity. Ranking and
    /// lookup-by-identity cannot be made sound otherwise.
    fn check_identities(&self, channels: &[ChannelRecord]) -> Result<(), DerivationError> {
        let mut seen = HashSet::new();
        for record in channels {
            if !seen.insert(record.identity.as_str()) {
                return Err(DerivationError::DuplicateIdentity(record.identity.clone()));
            }
        }
        Ok(())
    }

    /// Calculates the population mean and sample standard deviation of one
    /// measurement column.
    fn calculate_stats(&self, values: &[Decimal]) -> Result<MeasurementStats, DerivationError> {
        let sum: Decimal = values.iter().sum();
        let mean = sum / Decimal::from(values.len());

        // Sample (n - 1) standard deviation. With a single channel there is
        // no dispersion to measure, so it is defined as zero.
        let std_dev = if values.len() < 2 {
            Decimal::ZERO
        } else {
            let variance: Decimal = values
                .iter()
                .map(|v| (*v - mean) * (*v - mean))
                .sum::<Decimal>()
                / Decimal::from(values.len() - 1);

            variance.sqrt().ok_or_else(|| {
                DerivationError::Internal(
                    "Failed to calculate square root for variance".to_string(),
                )
            })?
        };

        Ok(MeasurementStats { mean, std_dev })
    }

    /// Calculates the two derived columns for one channel value. The
    /// degenerate cases (no dispersion, zero mean) are defined as zero
    /// rather than raised as faults.
    fn calculate_scores(&self, value: Decimal, stats: &MeasurementStats) -> DerivedScores {
        let normalized_score = if stats.std_dev == Decimal::ZERO {
            Decimal::ZERO
        } else {
            (value - stats.mean) / stats.std_dev
        };

        let relative_deviation_pct = if stats.mean == Decimal::ZERO {
            Decimal::ZERO
        } else {
            ((value - stats.mean) / stats.mean) * Decimal::from(100)
        };

        DerivedScores {
            normalized_score,
            relative_deviation_pct,
        }
    }
}

/// Computes one ratio measurement for one channel: sum of the numerators
/// divided by the denominator, zero when the denominator is zero.
fn ratio_value(
    entity: &DerivedChannel,
    ratio: &RatioDefinition,
) -> Result<Decimal, DerivationError> {
    let mut numerator = Decimal::ZERO;
    for name in &ratio.numerators {
        numerator += entity
            .measurement(name)
            .ok_or_else(|| DerivationError::MissingMeasurement {
                measurement: name.clone(),
                identity: entity.identity.clone(),
            })?;
    }

    let denominator =
        entity
            .measurement(&ratio.denominator)
            .ok_or_else(|| DerivationError::MissingMeasurement {
                measurement: ratio.denominator.clone(),
                identity: entity.identity.clone(),
            })?;

    if denominator == Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    Ok(numerator / denominator)
}

/// Collects one measurement column across all channels, in table order.
fn column_values(
    entities: &[DerivedChannel],
    name: &str,
) -> Result<Vec<Decimal>, DerivationError> {
    entities
        .iter()
        .map(|entity| {
            entity
                .measurement(name)
                .ok_or_else(|| DerivationError::MissingMeasurement {
                    measurement: name.to_string(),
                    identity: entity.identity.clone(),
                })
        })
        .collect()
}
