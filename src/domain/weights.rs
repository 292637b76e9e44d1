use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::drill::{DrillDefinition, DrillKey};
use crate::errors::DrillError;

/// Organizer-supplied drill weights. Values are non-negative and need not
/// sum to one; the aggregator renormalizes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<DrillKey, f64>", into = "BTreeMap<DrillKey, f64>")]
pub struct WeightConfiguration {
    weights: BTreeMap<DrillKey, f64>,
}

impl WeightConfiguration {
    pub fn new<I, K>(weights: I) -> Result<Self, DrillError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<DrillKey>,
    {
        let mut map = BTreeMap::new();
        for (key, weight) in weights {
            let key = key.into();
            if !weight.is_finite() || weight < 0.0 {
                return Err(DrillError::InvalidWeight { key, weight });
            }
            map.insert(key, weight);
        }
        Ok(Self { weights: map })
    }

    /// Each drill's `default_weight`.
    pub fn from_defaults(drills: &[DrillDefinition]) -> Result<Self, DrillError> {
        Self::new(drills.iter().map(|d| (d.key.clone(), d.default_weight)))
    }

    pub fn get(&self, drill_key: &str) -> f64 {
        self.weights.get(drill_key).copied().unwrap_or(0.0)
    }

    /// Overrides single entries, e.g. from slider adjustments.
    pub fn set(&mut self, drill_key: &str, weight: f64) -> Result<(), DrillError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(DrillError::InvalidWeight {
                key: drill_key.to_string(),
                weight,
            });
        }
        self.weights.insert(drill_key.to_string(), weight);
        Ok(())
    }

    /// Sum of the positive weights configured for `drills`.
    pub fn total_for(&self, drills: &[DrillDefinition]) -> f64 {
        drills
            .iter()
            .map(|d| self.get(&d.key))
            .filter(|w| *w > 0.0)
            .sum()
    }
}

impl TryFrom<BTreeMap<DrillKey, f64>> for WeightConfiguration {
    type Error = DrillError;

    fn try_from(value: BTreeMap<DrillKey, f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeightConfiguration> for BTreeMap<DrillKey, f64> {
    fn from(value: WeightConfiguration) -> Self {
        value.weights
    }
}
