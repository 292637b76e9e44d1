use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type DrillKey = String;

/// Which end of a drill's raw scale is the better performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl Direction {
    pub fn from_lower_is_better(lower_is_better: bool) -> Self {
        if lower_is_better {
            Direction::LowerIsBetter
        } else {
            Direction::HigherIsBetter
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Direction::HigherIsBetter => "higher_is_better",
            Direction::LowerIsBetter => "lower_is_better",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillCategory {
    Speed,
    Power,
    Agility,
    Skills,
    Technical,
    Shooting,
    Defense,
    Offense,
    Hitting,
    Throwing,
    Fielding,
    Catching,
    Sprint,
    Field,
    Distance,
    Fitness,
    Custom,
}

impl DrillCategory {
    pub const ALL: [DrillCategory; 17] = [
        DrillCategory::Speed,
        DrillCategory::Power,
        DrillCategory::Agility,
        DrillCategory::Skills,
        DrillCategory::Technical,
        DrillCategory::Shooting,
        DrillCategory::Defense,
        DrillCategory::Offense,
        DrillCategory::Hitting,
        DrillCategory::Throwing,
        DrillCategory::Fielding,
        DrillCategory::Catching,
        DrillCategory::Sprint,
        DrillCategory::Field,
        DrillCategory::Distance,
        DrillCategory::Fitness,
        DrillCategory::Custom,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DrillCategory::Speed => "speed",
            DrillCategory::Power => "power",
            DrillCategory::Agility => "agility",
            DrillCategory::Skills => "skills",
            DrillCategory::Technical => "technical",
            DrillCategory::Shooting => "shooting",
            DrillCategory::Defense => "defense",
            DrillCategory::Offense => "offense",
            DrillCategory::Hitting => "hitting",
            DrillCategory::Throwing => "throwing",
            DrillCategory::Fielding => "fielding",
            DrillCategory::Catching => "catching",
            DrillCategory::Sprint => "sprint",
            DrillCategory::Field => "field",
            DrillCategory::Distance => "distance",
            DrillCategory::Fitness => "fitness",
            DrillCategory::Custom => "custom",
        }
    }

    /// Case-insensitive lookup; `None` for anything outside the fixed set.
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == wanted)
    }
}

impl fmt::Display for DrillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement unit of a drill. Known units are matched case-insensitively;
/// anything else is carried verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DrillUnit {
    Seconds,
    Minutes,
    Inches,
    Feet,
    Points,
    Mph,
    Percent,
    Level,
    Reps,
    Pounds,
    Other(String),
}

impl DrillUnit {
    pub fn as_str(&self) -> &str {
        match self {
            DrillUnit::Seconds => "sec",
            DrillUnit::Minutes => "min",
            DrillUnit::Inches => "in",
            DrillUnit::Feet => "ft",
            DrillUnit::Points => "pts",
            DrillUnit::Mph => "mph",
            DrillUnit::Percent => "%",
            DrillUnit::Level => "level",
            DrillUnit::Reps => "reps",
            DrillUnit::Pounds => "lbs",
            DrillUnit::Other(text) => text,
        }
    }

    /// Resolves a known unit from its usual spellings.
    pub fn known(value: &str) -> Option<Self> {
        let unit = match value.trim().to_lowercase().as_str() {
            "sec" | "s" | "secs" | "second" | "seconds" => DrillUnit::Seconds,
            "min" | "mins" | "minute" | "minutes" => DrillUnit::Minutes,
            "in" | "inch" | "inches" => DrillUnit::Inches,
            "ft" | "foot" | "feet" => DrillUnit::Feet,
            "pts" | "pt" | "points" => DrillUnit::Points,
            "mph" => DrillUnit::Mph,
            "%" | "pct" | "percent" => DrillUnit::Percent,
            "level" => DrillUnit::Level,
            "reps" | "rep" => DrillUnit::Reps,
            "lbs" | "lb" | "pounds" => DrillUnit::Pounds,
            _ => return None,
        };
        Some(unit)
    }

    pub fn is_other(&self) -> bool {
        matches!(self, DrillUnit::Other(_))
    }

    pub fn is_time(&self) -> bool {
        matches!(self, DrillUnit::Seconds | DrillUnit::Minutes)
    }

    /// Units whose raw values can never be negative.
    pub fn is_physical_magnitude(&self) -> bool {
        matches!(
            self,
            DrillUnit::Inches | DrillUnit::Feet | DrillUnit::Mph | DrillUnit::Reps | DrillUnit::Pounds
        )
    }
}

impl From<String> for DrillUnit {
    fn from(value: String) -> Self {
        DrillUnit::known(&value).unwrap_or(DrillUnit::Other(value))
    }
}

impl From<DrillUnit> for String {
    fn from(unit: DrillUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for DrillUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval a drill's raw values are normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillRange {
    pub min: f64,
    pub max: f64,
}

impl DrillRange {
    /// Marks a drill nobody in the population has a value for.
    pub const UNBOUNDED: DrillRange = DrillRange {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_bounded(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

fn is_valid_range(min: f64, max: f64) -> bool {
    min.is_finite() && max.is_finite() && min < max
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillDefinition {
    pub key: DrillKey,
    pub label: String,
    pub unit: DrillUnit,
    pub category: DrillCategory,
    pub direction: Direction,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub default_weight: f64,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DrillDefinition {
    /// Built-in template drill. Ranges and weights are attached with the
    /// `with_*` builders.
    pub fn builtin(
        key: &str,
        label: &str,
        unit: DrillUnit,
        category: DrillCategory,
        direction: Direction,
    ) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            unit,
            category,
            direction,
            min: None,
            max: None,
            default_weight: 0.0,
            is_custom: false,
            locked: false,
            created_by: None,
            created_at: None,
            description: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    /// Schema-defined range, present only when both bounds are set, finite
    /// and `min < max`. Anything else falls back to the observed range.
    pub fn explicit_range(&self) -> Option<DrillRange> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if is_valid_range(min, max) => Some(DrillRange::new(min, max)),
            _ => None,
        }
    }
}
