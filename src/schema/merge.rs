use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::{Direction, DrillCategory, DrillDefinition, DrillKey, DrillUnit};

/// Drill as published by the external schema service. Every field except
/// the key may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalDrillDefinition {
    pub key: DrillKey,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub lower_is_better: Option<bool>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "min_value")]
    pub min: Option<f64>,
    #[serde(default, alias = "max_value")]
    pub max: Option<f64>,
    #[serde(default)]
    pub default_weight: Option<f64>,
    #[serde(default)]
    pub is_custom: Option<bool>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExternalDrillDefinition {
    fn direction(&self) -> Option<Direction> {
        self.lower_is_better.map(Direction::from_lower_is_better)
    }

    fn parsed_category(&self) -> Option<DrillCategory> {
        let raw = self.category.as_deref()?;
        let parsed = DrillCategory::parse(raw);
        if parsed.is_none() {
            warn!("Ignoring unknown category '{}' on external drill {}", raw, self.key);
        }
        parsed
    }

    /// Full definition for a drill the local templates do not know, or
    /// `None` when a required field is missing.
    pub fn to_definition(&self) -> Option<DrillDefinition> {
        let label = self.label.as_deref()?;
        let unit = DrillUnit::from(self.unit.clone()?);
        let category = self.parsed_category()?;
        let direction = self.direction()?;

        let base = DrillDefinition::builtin(&self.key, label, unit, category, direction);
        Some(merge_drill(&base, self))
    }
}

/// Overlays the fields present in `external` onto `local`. Absent fields
/// never blank out what the local definition already knows.
pub fn merge_drill(local: &DrillDefinition, external: &ExternalDrillDefinition) -> DrillDefinition {
    let mut merged = local.clone();

    if let Some(label) = &external.label {
        merged.label = label.clone();
    }
    if let Some(unit) = &external.unit {
        merged.unit = DrillUnit::from(unit.clone());
    }
    if let Some(category) = external.parsed_category() {
        merged.category = category;
    }
    if let Some(direction) = external.direction() {
        merged.direction = direction;
    }
    merge_bounds(&mut merged, external);
    if let Some(weight) = external.default_weight.filter(|w| w.is_finite() && *w >= 0.0) {
        merged.default_weight = weight;
    }
    if let Some(is_custom) = external.is_custom {
        merged.is_custom = is_custom;
    }
    if let Some(locked) = external.locked {
        merged.locked = locked;
    }
    if external.description.is_some() {
        merged.description = external.description.clone();
    }

    merged
}

/// Applies the external bounds only when the resulting pair is still a
/// usable range; a one-sided override may otherwise cross the other bound.
fn merge_bounds(merged: &mut DrillDefinition, external: &ExternalDrillDefinition) {
    if external.min.is_none() && external.max.is_none() {
        return;
    }

    let min = external.min.or(merged.min);
    let max = external.max.or(merged.max);
    if let (Some(lo), Some(hi)) = (min, max) {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            warn!(
                "Ignoring external range [{}, {}] for drill {}: min must be below max",
                lo, hi, merged.key
            );
            return;
        }
    }
    merged.min = min;
    merged.max = max;
}

/// Whitelist merge of an external schema over local drills.
///
/// External order comes first; local drills the external source does not
/// mention follow in their own order. External-only drills are accepted
/// only when complete.
pub fn merge_schema(local: &[DrillDefinition], external: &[ExternalDrillDefinition]) -> Vec<DrillDefinition> {
    let mut merged = Vec::with_capacity(local.len() + external.len());
    let mut seen: HashSet<&str> = HashSet::new();

    for ext in external {
        if !seen.insert(ext.key.as_str()) {
            warn!("Skipping repeated external drill {}", ext.key);
            continue;
        }

        match local.iter().find(|d| d.key == ext.key) {
            Some(known) => merged.push(merge_drill(known, ext)),
            None => match ext.to_definition() {
                Some(definition) => merged.push(definition),
                None => warn!(
                    "Skipping external drill {}: label, unit, category and direction are required",
                    ext.key
                ),
            },
        }
    }

    merged.extend(
        local
            .iter()
            .filter(|d| !seen.contains(d.key.as_str()))
            .cloned(),
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> Vec<DrillDefinition> {
        vec![
            DrillDefinition::builtin(
                "sprint",
                "40-Yard Sprint",
                DrillUnit::Seconds,
                DrillCategory::Speed,
                Direction::LowerIsBetter,
            )
            .with_range(3.0, 15.0)
            .with_default_weight(0.3),
            DrillDefinition::builtin(
                "vertical_jump",
                "Vertical Jump",
                DrillUnit::Inches,
                DrillCategory::Power,
                Direction::HigherIsBetter,
            ),
        ]
    }

    fn external(key: &str) -> ExternalDrillDefinition {
        ExternalDrillDefinition {
            key: key.to_string(),
            ..ExternalDrillDefinition::default()
        }
    }

    #[test]
    fn test_absent_fields_keep_local_values() {
        let mut ext = external("sprint");
        ext.label = Some("Sprint (40yd)".to_string());

        let merged = merge_drill(&local()[0], &ext);
        assert_eq!(merged.label, "Sprint (40yd)");
        assert_eq!(merged.direction, Direction::LowerIsBetter);
        assert_eq!(merged.min, Some(3.0));
        assert_eq!(merged.max, Some(15.0));
        assert_eq!(merged.default_weight, 0.3);
    }

    #[test]
    fn test_present_fields_override() {
        let mut ext = external("vertical_jump");
        ext.lower_is_better = Some(true);
        ext.min = Some(0.0);
        ext.max = Some(45.0);
        ext.category = Some("juggling".to_string());

        let merged = merge_drill(&local()[1], &ext);
        assert_eq!(merged.direction, Direction::LowerIsBetter);
        assert_eq!(merged.explicit_range().map(|r| r.max), Some(45.0));
        assert_eq!(merged.category, DrillCategory::Power);
    }

    #[test]
    fn test_one_sided_override_cannot_invert_range() {
        let mut ext = external("sprint");
        ext.max = Some(2.0);

        let merged = merge_drill(&local()[0], &ext);
        assert_eq!(merged.min, Some(3.0));
        assert_eq!(merged.max, Some(15.0));

        ext.max = Some(12.0);
        let merged = merge_drill(&local()[0], &ext);
        assert_eq!(merged.explicit_range().map(|r| (r.min, r.max)), Some((3.0, 12.0)));
    }

    #[test]
    fn test_merge_orders_external_first() {
        let ext = vec![external("vertical_jump")];
        let keys: Vec<String> = merge_schema(&local(), &ext).into_iter().map(|d| d.key).collect();
        assert_eq!(keys, vec!["vertical_jump".to_string(), "sprint".to_string()]);
    }

    #[test]
    fn test_incomplete_unknown_drill_is_skipped() {
        let mut partial = external("broad_jump");
        partial.label = Some("Broad Jump".to_string());

        let mut complete = external("shuttle");
        complete.label = Some("Shuttle".to_string());
        complete.unit = Some("sec".to_string());
        complete.category = Some("agility".to_string());
        complete.lower_is_better = Some(true);
        complete.max = Some(9.0);

        let merged = merge_schema(&local(), &[partial, complete]);
        let keys: Vec<&str> = merged.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["shuttle", "sprint", "vertical_jump"]);
        assert_eq!(merged[0].unit, DrillUnit::Seconds);
        assert_eq!(merged[0].max, Some(9.0));
        assert_eq!(merged[0].explicit_range(), None);
    }

    #[test]
    fn test_external_json_accepts_legacy_range_names() {
        let json = r#"{"key": "sprint", "lower_is_better": false, "min_value": 1.5, "max_value": 9}"#;
        let ext: ExternalDrillDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(ext.min, Some(1.5));
        assert_eq!(ext.max, Some(9.0));
        assert_eq!(ext.lower_is_better, Some(false));
    }
}
