//! Share-of-total breakdowns over a derived snapshot.
//!
//! The aggregation queries are pure reads: summing one measurement across
//! the table and expressing each channel as a fraction of that total, plus
//! a selected/rest partition used only for presentation styling.

use analytics::{DerivedChannel, DerivedTable};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub mod error;

pub use error::AggregationError;

/// The result of summing one measurement across the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    /// Sum of the measurement over every channel.
    pub total: Decimal,
    /// Identity -> fraction of the total. All zero when the total is zero.
    pub shares: HashMap<String, Decimal>,
}

impl Breakdown {
    /// A single channel's fraction of the total.
    pub fn share_of(&self, identity: &str) -> Option<Decimal> {
        self.shares.get(identity).copied()
    }
}

/// A selected/rest partition of the table for presentation styling.
///
/// Carries no numeric effect: totals and shares are identical whichever
/// channel is highlighted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight<'a> {
    pub selected: &'a DerivedChannel,
    /// Every other channel, in input order.
    pub rest: Vec<&'a DerivedChannel>,
}

/// Sums one measurement across the table and computes per-channel shares.
pub fn aggregate(
    table: &DerivedTable,
    measurement: &str,
) -> Result<Breakdown, AggregationError> {
    if table.is_empty() {
        return Err(AggregationError::EmptyTable);
    }

    let mut total = Decimal::ZERO;
    let mut values = Vec::with_capacity(table.len());
    for entity in table.entities() {
        let value = entity.measurement(measurement).ok_or_else(|| {
            AggregationError::MissingMeasurement {
                measurement: measurement.to_string(),
                identity: entity.identity.clone(),
            }
        })?;
        total += value;
        values.push((entity.identity.clone(), value));
    }

    // A zero total means there is nothing to apportion; every share is
    // defined as zero rather than raising a division fault.
    let shares = values
        .into_iter()
        .map(|(identity, value)| {
            let share = if total == Decimal::ZERO {
                Decimal::ZERO
            } else {
                value / total
            };
            (identity, share)
        })
        .collect();

    tracing::debug!(%measurement, %total, "Aggregated share-of-total breakdown");

    Ok(Breakdown { total, shares })
}

/// Splits the table into the selected channel and everyone else.
pub fn highlight<'a>(
    table: &'a DerivedTable,
    identity: &str,
) -> Result<Highlight<'a>, AggregationError> {
    let selected = table
        .entity(identity)
        .ok_or_else(|| AggregationError::EntityNotFound(identity.to_string()))?;

    let rest = table
        .entities()
        .iter()
        .filter(|entity| entity.identity != identity)
        .collect();

    Ok(Highlight { selected, rest })
}
