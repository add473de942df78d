use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the raw input table: a single channel and its measurements.
///
/// The identity doubles as the lookup key for ranking and highlight queries,
/// so it must be unique across a table. Uniqueness is enforced when a table
/// is derived, not here, since a single record cannot see its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Unique, stable display name used as the lookup key.
    pub identity: String,
    /// Raw measurement name -> value (e.g. "total_views", "subscriber_count").
    pub measurements: HashMap<String, Decimal>,
}

impl ChannelRecord {
    /// Creates a record, rejecting blank identities up front.
    pub fn new(
        identity: impl Into<String>,
        measurements: HashMap<String, Decimal>,
    ) -> Result<Self, CoreError> {
        let identity = identity.into();
        if identity.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "identity".to_string(),
                "must not be blank".to_string(),
            ));
        }
        Ok(Self {
            identity,
            measurements,
        })
    }

    /// Looks up a raw measurement by name.
    pub fn measurement(&self, name: &str) -> Option<Decimal> {
        self.measurements.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_accepts_named_channel() {
        let record = ChannelRecord::new(
            "Ken Fornari",
            HashMap::from([("total_views".to_string(), dec!(1000))]),
        )
        .unwrap();

        assert_eq!(record.identity, "Ken Fornari");
        assert_eq!(record.measurement("total_views"), Some(dec!(1000)));
        assert_eq!(record.measurement("likes"), None);
    }

    #[test]
    fn new_rejects_blank_identity() {
        let result = ChannelRecord::new("   ", HashMap::new());
        assert!(matches!(result, Err(CoreError::InvalidInput(_, _))));
    }
}
