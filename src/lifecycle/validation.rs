use std::fmt;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ValidationSettings;
use crate::domain::{Direction, DrillCategory, DrillDefinition, DrillRange, DrillUnit};
use crate::errors::DrillError;

/// Characters that break or hijack a CSV header cell.
const CSV_UNSAFE_PATTERN: &str = r#"[,;"'\\|\t\r\n]"#;
const FORMULA_TRIGGERS: &[char] = &['=', '+', '-', '@'];

/// Organizer request for a new custom drill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDrillRequest {
    pub label: String,
    pub unit: String,
    pub category: String,
    pub direction: Direction,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update of a custom drill; `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrillPatch {
    pub label: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub direction: Option<Direction>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// A blank string removes the description.
    pub description: Option<String>,
    pub default_weight: Option<f64>,
}

/// Plausibility problems that do not make a definition invalid but need the
/// organizer to confirm them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeWarning {
    TimeLimitExceeded { unit: String, max: f64, limit: f64 },
    PercentOutOfBounds { min: f64, max: f64 },
    NegativeMagnitude { unit: String, min: f64 },
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeWarning::TimeLimitExceeded { unit, max, limit } => {
                write!(f, "max {} {} is above the usual limit of {} {}", max, unit, limit, unit)
            }
            RangeWarning::PercentOutOfBounds { min, max } => {
                write!(f, "percentage range [{}, {}] leaves [0, 100]", min, max)
            }
            RangeWarning::NegativeMagnitude { unit, min } => {
                write!(f, "min {} {} is negative for a unit that cannot be", min, unit)
            }
        }
    }
}

/// Fields of a definition that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDrill {
    pub label: String,
    pub unit: DrillUnit,
    pub category: DrillCategory,
    pub direction: Direction,
    pub range: DrillRange,
    pub description: Option<String>,
    pub warnings: Vec<RangeWarning>,
}

pub struct DrillValidator {
    settings: ValidationSettings,
    csv_unsafe: Regex,
}

impl DrillValidator {
    pub fn new(settings: ValidationSettings) -> Result<Self> {
        let csv_unsafe = Self::compile_regex()?;
        Ok(Self {
            settings,
            csv_unsafe,
        })
    }

    fn compile_regex() -> Result<Regex> {
        Regex::new(CSV_UNSAFE_PATTERN).context("Failed to compile CSV sanitizer regex")
    }

    pub fn validate(&self, request: &CustomDrillRequest) -> Result<ValidatedDrill, DrillError> {
        let label = self.validate_label(&request.label)?;
        let category = self.parse_category(&request.category)?;
        let unit = self.parse_unit(&request.unit)?;
        let range = self.validate_range(request.min, request.max)?;
        let warnings = self.range_warnings(&unit, &range);

        Ok(ValidatedDrill {
            label,
            unit,
            category,
            direction: request.direction,
            range,
            description: request
                .description
                .as_ref()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            warnings,
        })
    }

    /// Re-checks a stored custom drill, e.g. one read back from a snapshot.
    /// The copy returned carries the trimmed label and the sanitized unit.
    pub fn validate_definition(&self, drill: &DrillDefinition) -> Result<DrillDefinition, DrillError> {
        let label = self.validate_label(&drill.label)?;
        let unit = self.parse_unit(drill.unit.as_str())?;
        self.validate_range(drill.min, drill.max)?;

        Ok(DrillDefinition {
            label,
            unit,
            ..drill.clone()
        })
    }

    pub fn validate_label(&self, label: &str) -> Result<String, DrillError> {
        let trimmed = label.trim();
        let length = trimmed.chars().count();
        let (min, max) = (self.settings.label_min_len, self.settings.label_max_len);

        if length < min || length > max {
            return Err(DrillError::InvalidDrillDefinition(format!(
                "label must be {}-{} characters, got {}",
                min, max, length
            )));
        }
        Ok(trimmed.to_string())
    }

    pub fn parse_category(&self, category: &str) -> Result<DrillCategory, DrillError> {
        DrillCategory::parse(category).ok_or_else(|| {
            DrillError::InvalidDrillDefinition(format!("unknown category '{}'", category.trim()))
        })
    }

    /// Known units map to their variant; anything else becomes a sanitized
    /// free-form unit.
    pub fn parse_unit(&self, unit: &str) -> Result<DrillUnit, DrillError> {
        if let Some(known) = DrillUnit::known(unit) {
            return Ok(known);
        }

        let sanitized = self.sanitize_unit(unit);
        if sanitized.is_empty() {
            return Err(DrillError::InvalidDrillDefinition(
                "unit is empty after removing unsupported characters".to_string(),
            ));
        }

        let length = sanitized.chars().count();
        if length > self.settings.custom_unit_max_len {
            return Err(DrillError::InvalidDrillDefinition(format!(
                "custom unit must be at most {} characters, got {}",
                self.settings.custom_unit_max_len, length
            )));
        }
        Ok(DrillUnit::Other(sanitized))
    }

    pub fn sanitize_unit(&self, unit: &str) -> String {
        let stripped = self.csv_unsafe.replace_all(unit, "");
        stripped
            .trim()
            .trim_start_matches(FORMULA_TRIGGERS)
            .trim()
            .to_string()
    }

    pub fn validate_range(&self, min: Option<f64>, max: Option<f64>) -> Result<DrillRange, DrillError> {
        let (min, max) = match (min, max) {
            (Some(min), Some(max)) => (min, max),
            _ => {
                return Err(DrillError::InvalidDrillDefinition(
                    "both minimum and maximum values are required".to_string(),
                ));
            }
        };

        if !min.is_finite() || !max.is_finite() {
            return Err(DrillError::InvalidDrillDefinition(
                "minimum and maximum must be finite numbers".to_string(),
            ));
        }
        if min >= max {
            return Err(DrillError::InvalidDrillDefinition(format!(
                "minimum value ({}) must be less than maximum value ({})",
                min, max
            )));
        }
        Ok(DrillRange::new(min, max))
    }

    pub fn range_warnings(&self, unit: &DrillUnit, range: &DrillRange) -> Vec<RangeWarning> {
        let mut warnings = Vec::new();

        let time_limit = match unit {
            DrillUnit::Seconds => Some(self.settings.max_time_seconds),
            DrillUnit::Minutes => Some(self.settings.max_time_minutes),
            _ => None,
        };
        if let Some(limit) = time_limit {
            if range.max > limit {
                warnings.push(RangeWarning::TimeLimitExceeded {
                    unit: unit.to_string(),
                    max: range.max,
                    limit,
                });
            }
        }

        if *unit == DrillUnit::Percent && (range.min < 0.0 || range.max > 100.0) {
            warnings.push(RangeWarning::PercentOutOfBounds {
                min: range.min,
                max: range.max,
            });
        }

        if unit.is_physical_magnitude() && range.min < 0.0 {
            warnings.push(RangeWarning::NegativeMagnitude {
                unit: unit.to_string(),
                min: range.min,
            });
        }

        warnings
    }
}
