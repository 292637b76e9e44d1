use std::collections::HashMap;

use super::normalization::normalize;
use crate::domain::{DrillDefinition, DrillKey, DrillRange, PlayerScoreRecord, WeightConfiguration};

/// Weighted composite of a player's normalized drill scores.
///
/// The denominator is the total positive weight over `drills`, fixed for
/// every player: a missing drill contributes nothing instead of being
/// re-weighted away. Zero total weight yields 0.
pub fn aggregate(
    record: &PlayerScoreRecord,
    drills: &[DrillDefinition],
    weights: &WeightConfiguration,
    ranges: &HashMap<DrillKey, DrillRange>,
) -> f64 {
    let total_weight = weights.total_for(drills);
    if total_weight <= 0.0 {
        return 0.0;
    }

    drills
        .iter()
        .filter_map(|drill| weighted_contribution(record, drill, weights, ranges, total_weight))
        .sum()
}

fn weighted_contribution(
    record: &PlayerScoreRecord,
    drill: &DrillDefinition,
    weights: &WeightConfiguration,
    ranges: &HashMap<DrillKey, DrillRange>,
    total_weight: f64,
) -> Option<f64> {
    let weight = weights.get(&drill.key);
    if weight <= 0.0 {
        return None;
    }

    let raw = record.score(&drill.key)?;
    let range = ranges.get(&drill.key).copied().unwrap_or(DrillRange::UNBOUNDED);
    Some(normalize(Some(raw), range, drill.direction) * weight / total_weight)
}
