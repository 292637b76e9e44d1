use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::drill::{DrillDefinition, DrillKey};

pub type PlayerId = String;

/// Population a range scan or a ranking is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Population {
    All,
    AgeGroup(String),
}

impl Population {
    /// `ALL` in any case is the global population.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            Population::All
        } else {
            Population::AgeGroup(trimmed.to_string())
        }
    }

    pub fn contains(&self, record: &PlayerScoreRecord) -> bool {
        match self {
            Population::All => true,
            Population::AgeGroup(group) => record.age_group == *group,
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Population::All => f.write_str("all"),
            Population::AgeGroup(group) => f.write_str(group),
        }
    }
}

/// Raw results recorded for one player within one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScoreRecord {
    pub player_id: PlayerId,
    pub age_group: String,
    #[serde(default, deserialize_with = "deserialize_scores")]
    pub scores: BTreeMap<DrillKey, f64>,
}

impl PlayerScoreRecord {
    pub fn new(player_id: &str, age_group: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            age_group: age_group.to_string(),
            scores: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, drill_key: &str, value: f64) -> Self {
        self.record(drill_key, value);
        self
    }

    /// Stores a raw value; non-finite input is treated as absent.
    pub fn record(&mut self, drill_key: &str, value: f64) {
        if value.is_finite() {
            self.scores.insert(drill_key.to_string(), value);
        } else {
            self.scores.remove(drill_key);
        }
    }

    pub fn score(&self, drill_key: &str) -> Option<f64> {
        self.scores.get(drill_key).copied()
    }

    pub fn has_score(&self, drill_key: &str) -> bool {
        self.scores.contains_key(drill_key)
    }

    pub fn recorded_count(&self, drills: &[DrillDefinition]) -> usize {
        drills.iter().filter(|d| self.has_score(&d.key)).count()
    }
}

fn deserialize_scores<'de, D>(deserializer: D) -> Result<BTreeMap<DrillKey, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<DrillKey, Value> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| numeric_value(&value).map(|v| (key, v)))
        .collect())
}

/// Numbers and numeric strings count as recorded; everything else is absent.
fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}
