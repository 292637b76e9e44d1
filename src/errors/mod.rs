use thiserror::Error;

use crate::lifecycle::RangeWarning;

/// Failures of the drill lifecycle and weight configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrillError {
    #[error("invalid drill definition: {0}")]
    InvalidDrillDefinition(String),

    /// Not a hard failure: the caller must confirm the listed warnings and
    /// retry with acknowledgement.
    #[error("range looks suspicious and needs confirmation: {}", format_warnings(.0))]
    UnacknowledgedWarnings(Vec<RangeWarning>),

    #[error("drill '{key}' cannot be changed after Live Entry has started")]
    LockedDrillMutation { key: String },

    #[error("event '{event_id}' is in Live Entry and no longer accepts new drills")]
    LockedSchema { event_id: String },

    #[error("a drill labelled '{0}' already exists in this event")]
    DuplicateLabel(String),

    #[error("drill not found: {0}")]
    DrillNotFound(String),

    #[error("drill '{0}' is a built-in template drill and can only be disabled")]
    BuiltInDrill(String),

    #[error("drill '{key}' already has {count} recorded score(s)")]
    DrillHasScores { key: String, count: usize },

    #[error("weight for '{key}' must be a non-negative number, got {weight}")]
    InvalidWeight { key: String, weight: f64 },

    #[error("unknown weight preset '{preset}' for template '{template}'")]
    UnknownPreset { template: String, preset: String },
}

fn format_warnings(warnings: &[RangeWarning]) -> String {
    warnings
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Add context to snapshot load errors
pub fn load_context(path: &str) -> String {
    format!("Failed to load event snapshot from: {}", path)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}
