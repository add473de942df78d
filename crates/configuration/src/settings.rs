use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The full pillar registry: every analytical dimension the engine derives,
/// ranks, and aggregates, plus the ratio measurements computed up front.
///
/// The order of `pillars` is display order; the engine never reorders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub pillars: Vec<PillarDefinition>,
    /// Derived measurements computed from raw columns before any
    /// normalization happens. May be empty.
    #[serde(default)]
    pub ratios: Vec<RatioDefinition>,
}

/// One analytical dimension (e.g. reach, efficiency). Pure data: all
/// pillar-specific behavior lives in the measurement names it points at,
/// never in conditionals keyed on the pillar itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarDefinition {
    /// Stable identifier used to request rankings and views.
    pub key: String,
    /// Display label. Opaque to the engine; the presentation layer owns
    /// everything cosmetic.
    pub label: String,
    /// The measurement this pillar ranks on.
    pub metric: String,
    /// The measurement summed for share-of-total breakdowns. May differ
    /// from `metric` (reach ranks on subscribers-per-month but breaks down
    /// total views, for example).
    pub aggregate: String,
}

/// A derived measurement: sum the numerators, divide by the denominator.
///
/// Computed for every channel before normalization, then analyzed (mean,
/// standard deviation, scores) exactly like a raw pillar metric. A zero
/// denominator yields a ratio of zero rather than a fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioDefinition {
    /// Name the computed value is stored under in each channel's measurements.
    pub name: String,
    /// Raw measurements summed to form the numerator.
    pub numerators: Vec<String>,
    /// Raw measurement the numerator sum is divided by.
    pub denominator: String,
}

impl Registry {
    /// Checks the registry is structurally sound before any derivation
    /// consumes it. Measurement names are only checked for non-blankness
    /// here; existence against actual channel data is the derivation
    /// stage's job.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pillars.is_empty() {
            return Err(ConfigError::ValidationError(
                "registry must declare at least one pillar".to_string(),
            ));
        }

        let mut seen_keys = HashSet::new();
        for pillar in &self.pillars {
            if pillar.key.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "pillar key must not be blank".to_string(),
                ));
            }
            if !seen_keys.insert(pillar.key.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate pillar key '{}'",
                    pillar.key
                )));
            }
            if pillar.metric.trim().is_empty() || pillar.aggregate.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "pillar '{}' must name both a metric and an aggregate measurement",
                    pillar.key
                )));
            }
        }

        let mut seen_ratios = HashSet::new();
        for ratio in &self.ratios {
            if ratio.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "ratio name must not be blank".to_string(),
                ));
            }
            if !seen_ratios.insert(ratio.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate ratio name '{}'",
                    ratio.name
                )));
            }
            if ratio.numerators.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "ratio '{}' must name at least one numerator measurement",
                    ratio.name
                )));
            }
            if ratio.denominator.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "ratio '{}' must name a denominator measurement",
                    ratio.name
                )));
            }
        }

        Ok(())
    }

    /// Looks up a pillar by its stable key.
    pub fn pillar(&self, key: &str) -> Option<&PillarDefinition> {
        self.pillars.iter().find(|p| p.key == key)
    }

    /// Every measurement that gets normalized: each pillar's metric plus
    /// each ratio, deduplicated, in first-seen registry order.
    pub fn analyzed_measurements(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for name in self
            .pillars
            .iter()
            .map(|p| p.metric.as_str())
            .chain(self.ratios.iter().map(|r| r.name.as_str()))
        {
            if seen.insert(name) {
                names.push(name);
            }
        }
        names
    }
}
