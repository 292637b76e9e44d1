use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{DrillDefinition, DrillKey, EventDrillSchema, LiveEntryStatus, PlayerScoreRecord, WeightConfiguration};
use crate::errors::{load_context, parse_context};
use crate::lifecycle::DrillValidator;
use crate::schema::{assemble_event_schema, ExternalDrillDefinition, SchemaSources};

/// Everything the engine needs about one event, as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub event_id: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub status: LiveEntryStatus,
    #[serde(default)]
    pub disabled_drills: Vec<DrillKey>,
    #[serde(default)]
    pub custom_drills: Vec<DrillDefinition>,
    #[serde(default)]
    pub external_drills: Vec<ExternalDrillDefinition>,
    #[serde(default)]
    pub players: Vec<PlayerScoreRecord>,
    #[serde(default)]
    pub weights: Option<WeightConfiguration>,
}

impl EventSnapshot {
    pub fn schema(&self, validator: &DrillValidator) -> EventDrillSchema {
        assemble_event_schema(
            &SchemaSources {
                event_id: &self.event_id,
                template: self.template.as_deref(),
                status: self.status,
                disabled_drills: &self.disabled_drills,
                custom_drills: &self.custom_drills,
                external_drills: &self.external_drills,
            },
            validator,
        )
    }
}

/// Load an event snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<EventSnapshot> {
    let json = fs::read_to_string(path).with_context(|| load_context(&path.display().to_string()))?;
    let snapshot: EventSnapshot = serde_json::from_str(&json).with_context(|| {
        format!(
            "{} from {:?}. First 200 chars: {}",
            parse_context("event snapshot"),
            path,
            json.chars().take(200).collect::<String>()
        )
    })?;

    info!(
        "Loaded event {} with {} player(s) from {}",
        snapshot.event_id,
        snapshot.players.len(),
        path.display()
    );
    Ok(snapshot)
}

/// Write any serializable result as pretty JSON
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved output to {}", path.display());
    Ok(())
}
