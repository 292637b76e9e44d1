use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::drill::{DrillDefinition, DrillKey};

/// Live-entry phase of an event. Evaluation starting moves it to `Active`
/// and there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveEntryStatus {
    #[default]
    Draft,
    Active,
}

impl LiveEntryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LiveEntryStatus::Draft => "draft",
            LiveEntryStatus::Active => "active",
        }
    }
}

/// Ordered drill list owned by one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDrillSchema {
    pub event_id: String,
    #[serde(default)]
    pub status: LiveEntryStatus,
    pub drills: Vec<DrillDefinition>,
    #[serde(default)]
    pub disabled: BTreeSet<DrillKey>,
}

impl EventDrillSchema {
    pub fn new(event_id: &str, drills: Vec<DrillDefinition>) -> Self {
        Self {
            event_id: event_id.to_string(),
            status: LiveEntryStatus::Draft,
            drills,
            disabled: BTreeSet::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LiveEntryStatus::Active
    }

    pub fn drill(&self, key: &str) -> Option<&DrillDefinition> {
        self.drills.iter().find(|d| d.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.drill(key).is_some()
    }

    pub fn is_disabled(&self, key: &str) -> bool {
        self.disabled.contains(key)
    }

    /// Drills that take part in scoring, in schema order.
    pub fn active_drills(&self) -> Vec<DrillDefinition> {
        self.drills
            .iter()
            .filter(|d| !self.is_disabled(&d.key))
            .cloned()
            .collect()
    }

    pub fn custom_drills(&self) -> impl Iterator<Item = &DrillDefinition> {
        self.drills.iter().filter(|d| d.is_custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drill::{Direction, DrillCategory, DrillUnit};

    fn drill(key: &str) -> DrillDefinition {
        DrillDefinition::builtin(
            key,
            key,
            DrillUnit::Points,
            DrillCategory::Skills,
            Direction::HigherIsBetter,
        )
    }

    #[test]
    fn test_active_drills_skip_disabled_keys() {
        let mut schema = EventDrillSchema::new("e1", vec![drill("a"), drill("b"), drill("c")]);
        schema.disabled.insert("b".to_string());

        let keys: Vec<String> = schema.active_drills().into_iter().map(|d| d.key).collect();
        assert_eq!(keys, vec!["a".to_string(), "c".to_string()]);
        assert!(schema.contains("b"));
    }

    #[test]
    fn test_new_schema_starts_in_draft() {
        let schema = EventDrillSchema::new("e1", vec![]);
        assert_eq!(schema.status, LiveEntryStatus::Draft);
        assert!(!schema.is_active());
    }
}
