use log::{debug, info, warn};

use super::merge::{merge_schema, ExternalDrillDefinition};
use crate::config::{default_template, find_template, SportTemplate};
use crate::domain::{DrillDefinition, DrillKey, EventDrillSchema, LiveEntryStatus};
use crate::lifecycle::{activate_live_entry, DrillValidator};

/// Everything an event's effective drill list is built from.
#[derive(Debug, Clone, Default)]
pub struct SchemaSources<'a> {
    pub event_id: &'a str,
    pub template: Option<&'a str>,
    pub status: LiveEntryStatus,
    pub disabled_drills: &'a [DrillKey],
    pub custom_drills: &'a [DrillDefinition],
    pub external_drills: &'a [ExternalDrillDefinition],
}

/// Builds the schema of one event: template drills, then the event's custom
/// drills, overlaid by the external schema. Disabled keys only apply to
/// built-in drills. Custom drills that no longer pass `validator` are left
/// out. An `Active` event comes back with every drill locked.
pub fn assemble_event_schema(sources: &SchemaSources<'_>, validator: &DrillValidator) -> EventDrillSchema {
    let template = resolve_template(sources.event_id, sources.template);

    let template_count = template.drills.len();
    let mut drills = template.drills;
    append_custom_drills(&mut drills, sources, validator);

    if !sources.external_drills.is_empty() {
        drills = merge_schema(&drills, sources.external_drills);
        debug!(
            "Applied {} external definition(s) to event {}",
            sources.external_drills.len(),
            sources.event_id
        );
    }

    let mut schema = EventDrillSchema::new(sources.event_id, drills);
    for key in sources.disabled_drills {
        match schema.drill(key) {
            Some(drill) if !drill.is_custom => {
                schema.disabled.insert(key.clone());
            }
            _ => debug!("Ignoring disabled key {} for event {}", key, sources.event_id),
        }
    }

    if sources.status == LiveEntryStatus::Active {
        activate_live_entry(&mut schema);
    }

    info!(
        "Schema built for {}: {} template + {} custom, {} disabled, {} total",
        sources.event_id,
        template_count,
        schema.custom_drills().count(),
        schema.disabled.len(),
        schema.drills.len()
    );
    schema
}

fn resolve_template(event_id: &str, template_id: Option<&str>) -> SportTemplate {
    let Some(id) = template_id else {
        return default_template();
    };

    find_template(id).unwrap_or_else(|| {
        let fallback = default_template();
        warn!(
            "Invalid template '{}' for event {}. Fallback to {}.",
            id, event_id, fallback.id
        );
        fallback
    })
}

fn append_custom_drills(drills: &mut Vec<DrillDefinition>, sources: &SchemaSources<'_>, validator: &DrillValidator) {
    for drill in sources.custom_drills {
        if drills.iter().any(|d| d.key == drill.key) {
            warn!("Custom drill {} shadows an existing drill and was skipped", drill.key);
            continue;
        }
        match validator.validate_definition(drill) {
            Ok(valid) => drills.push(DrillDefinition {
                is_custom: true,
                ..valid
            }),
            Err(e) => warn!(
                "Skipping invalid custom drill {} for event {}: {}",
                drill.key, sources.event_id, e
            ),
        }
    }
}
