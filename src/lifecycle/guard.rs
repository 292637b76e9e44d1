use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};

use super::validation::{CustomDrillRequest, DrillPatch, DrillValidator, ValidatedDrill};
use crate::config::ValidationSettings;
use crate::domain::{DrillDefinition, EventDrillSchema, LiveEntryStatus, PlayerScoreRecord};
use crate::errors::DrillError;

const CUSTOM_KEY_PREFIX: &str = "custom_";

/// Enforces when an event's drill definitions may still change.
///
/// Every mutation is refused once the schema has left `Draft`; a refused
/// mutation leaves the schema untouched.
pub struct DrillLifecycleGuard {
    validator: DrillValidator,
}

impl DrillLifecycleGuard {
    pub fn new(settings: ValidationSettings) -> Result<Self> {
        Ok(Self {
            validator: DrillValidator::new(settings)?,
        })
    }

    pub fn validator(&self) -> &DrillValidator {
        &self.validator
    }

    /// Validates and appends a custom drill. Heuristic range warnings block
    /// creation until the caller acknowledges them.
    pub fn create_drill(
        &self,
        schema: &mut EventDrillSchema,
        request: &CustomDrillRequest,
        created_by: &str,
        acknowledge_warnings: bool,
    ) -> Result<DrillDefinition, DrillError> {
        ensure_schema_draft(schema)?;

        let validated = self.validator.validate(request)?;
        ensure_unique_label(schema, &validated.label, None)?;
        ensure_acknowledged(&validated, acknowledge_warnings)?;

        let key = generate_key(schema, &validated.label);
        let drill = DrillDefinition {
            key,
            label: validated.label,
            unit: validated.unit,
            category: validated.category,
            direction: validated.direction,
            min: Some(validated.range.min),
            max: Some(validated.range.max),
            default_weight: 0.0,
            is_custom: true,
            locked: false,
            created_by: Some(created_by.to_string()),
            created_at: Some(Utc::now()),
            description: validated.description,
        };

        info!("Created custom drill {} for event {}", drill.key, schema.event_id);
        schema.drills.push(drill.clone());
        Ok(drill)
    }

    /// Applies a patch to a custom drill. The patched definition is
    /// validated as a whole before anything is written.
    pub fn edit_drill(
        &self,
        schema: &mut EventDrillSchema,
        key: &str,
        patch: &DrillPatch,
        acknowledge_warnings: bool,
    ) -> Result<DrillDefinition, DrillError> {
        ensure_draft(schema, key)?;
        let current = find_custom(schema, key)?.clone();

        let request = merge_patch(&current, patch);
        let validated = self.validator.validate(&request)?;
        ensure_unique_label(schema, &validated.label, Some(key))?;
        ensure_acknowledged(&validated, acknowledge_warnings)?;

        let default_weight = match patch.default_weight {
            Some(weight) if !weight.is_finite() || weight < 0.0 => {
                return Err(DrillError::InvalidWeight {
                    key: key.to_string(),
                    weight,
                });
            }
            Some(weight) => weight,
            None => current.default_weight,
        };

        let updated = DrillDefinition {
            label: validated.label,
            unit: validated.unit,
            category: validated.category,
            direction: validated.direction,
            min: Some(validated.range.min),
            max: Some(validated.range.max),
            description: validated.description,
            default_weight,
            ..current
        };

        if let Some(slot) = schema.drills.iter_mut().find(|d| d.key == key) {
            *slot = updated.clone();
        }
        info!("Updated custom drill {} for event {}", key, schema.event_id);
        Ok(updated)
    }

    /// Removes a custom drill nobody has been scored on yet.
    pub fn delete_drill(
        &self,
        schema: &mut EventDrillSchema,
        key: &str,
        players: &[PlayerScoreRecord],
    ) -> Result<DrillDefinition, DrillError> {
        ensure_draft(schema, key)?;
        find_custom(schema, key)?;

        let count = players.iter().filter(|p| p.has_score(key)).count();
        if count > 0 {
            warn!(
                "Refused to delete drill {} (event {}): {} recorded score(s)",
                key, schema.event_id, count
            );
            return Err(DrillError::DrillHasScores {
                key: key.to_string(),
                count,
            });
        }

        let position = schema
            .drills
            .iter()
            .position(|d| d.key == key)
            .ok_or_else(|| DrillError::DrillNotFound(key.to_string()))?;
        let removed = schema.drills.remove(position);
        info!("Deleted custom drill {} from event {}", key, schema.event_id);
        Ok(removed)
    }

    /// Hides a built-in template drill from scoring.
    pub fn disable_drill(&self, schema: &mut EventDrillSchema, key: &str) -> Result<(), DrillError> {
        ensure_draft(schema, key)?;
        find_builtin(schema, key)?;
        schema.disabled.insert(key.to_string());
        debug!("Disabled drill {} for event {}", key, schema.event_id);
        Ok(())
    }

    pub fn enable_drill(&self, schema: &mut EventDrillSchema, key: &str) -> Result<(), DrillError> {
        ensure_draft(schema, key)?;
        find_builtin(schema, key)?;
        schema.disabled.remove(key);
        debug!("Enabled drill {} for event {}", key, schema.event_id);
        Ok(())
    }
}

/// Starts Live Entry: the schema becomes `Active` and every drill is locked
/// for good. Returns `false` when the schema was already active.
pub fn activate_live_entry(schema: &mut EventDrillSchema) -> bool {
    if schema.is_active() {
        return false;
    }

    schema.status = LiveEntryStatus::Active;
    for drill in schema.drills.iter_mut() {
        drill.locked = true;
    }
    info!(
        "Live Entry started for event {}: {} drill(s) locked",
        schema.event_id,
        schema.drills.len()
    );
    true
}

fn ensure_schema_draft(schema: &EventDrillSchema) -> Result<(), DrillError> {
    if schema.is_active() {
        warn!("Refused new drill on event {} ({})", schema.event_id, schema.status.as_str());
        return Err(DrillError::LockedSchema {
            event_id: schema.event_id.clone(),
        });
    }
    Ok(())
}

fn ensure_draft(schema: &EventDrillSchema, key: &str) -> Result<(), DrillError> {
    let drill_locked = schema.drill(key).map(|d| d.locked).unwrap_or(false);
    if schema.is_active() || drill_locked {
        warn!(
            "Refused mutation of drill {} on event {} ({})",
            key,
            schema.event_id,
            schema.status.as_str()
        );
        return Err(DrillError::LockedDrillMutation {
            key: key.to_string(),
        });
    }
    Ok(())
}

fn find_custom<'a>(schema: &'a EventDrillSchema, key: &str) -> Result<&'a DrillDefinition, DrillError> {
    let drill = schema
        .drill(key)
        .ok_or_else(|| DrillError::DrillNotFound(key.to_string()))?;
    if !drill.is_custom {
        return Err(DrillError::BuiltInDrill(key.to_string()));
    }
    Ok(drill)
}

fn find_builtin<'a>(schema: &'a EventDrillSchema, key: &str) -> Result<&'a DrillDefinition, DrillError> {
    let drill = schema
        .drill(key)
        .ok_or_else(|| DrillError::DrillNotFound(key.to_string()))?;
    if drill.is_custom {
        return Err(DrillError::InvalidDrillDefinition(format!(
            "custom drill '{}' is deleted, not disabled",
            key
        )));
    }
    Ok(drill)
}

fn ensure_unique_label(
    schema: &EventDrillSchema,
    label: &str,
    except_key: Option<&str>,
) -> Result<(), DrillError> {
    let wanted = label.to_lowercase();
    let taken = schema
        .drills
        .iter()
        .filter(|d| Some(d.key.as_str()) != except_key)
        .any(|d| d.label.trim().to_lowercase() == wanted);

    if taken {
        return Err(DrillError::DuplicateLabel(label.to_string()));
    }
    Ok(())
}

fn ensure_acknowledged(validated: &ValidatedDrill, acknowledged: bool) -> Result<(), DrillError> {
    if validated.warnings.is_empty() || acknowledged {
        return Ok(());
    }
    Err(DrillError::UnacknowledgedWarnings(validated.warnings.clone()))
}

fn merge_patch(current: &DrillDefinition, patch: &DrillPatch) -> CustomDrillRequest {
    CustomDrillRequest {
        label: patch.label.clone().unwrap_or_else(|| current.label.clone()),
        unit: patch.unit.clone().unwrap_or_else(|| current.unit.to_string()),
        category: patch
            .category
            .clone()
            .unwrap_or_else(|| current.category.to_string()),
        direction: patch.direction.unwrap_or(current.direction),
        min: patch.min.or(current.min),
        max: patch.max.or(current.max),
        description: patch.description.clone().or_else(|| current.description.clone()),
    }
}

fn generate_key(schema: &EventDrillSchema, label: &str) -> String {
    let slug = slugify(label);
    let base = if slug.is_empty() {
        format!("{}drill", CUSTOM_KEY_PREFIX)
    } else {
        format!("{}{}", CUSTOM_KEY_PREFIX, slug)
    };

    if !schema.contains(&base) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{}_{}", base, suffix);
        if !schema.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}
