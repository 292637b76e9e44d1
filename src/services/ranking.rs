use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;

use super::snapshot::EventSnapshot;
use crate::config::{default_template, find_template, AppConfig};
use crate::domain::{DrillDefinition, EventDrillSchema, Population, WeightConfiguration};
use crate::errors::DrillError;
use crate::lifecycle::DrillValidator;
use crate::scoring::{
    drill_leaderboard, rank_single_drill, DrillRankEntry, RangeResolver, RankedResult, RankingEngine,
    RankingScope,
};

/// Ranked row ready for CSV or JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub rank: usize,
    pub player_id: String,
    pub age_group: String,
    pub composite_score: String,
}

/// One player's standing on a single drill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillStanding {
    pub player_id: String,
    pub drill_key: String,
    pub value: Option<f64>,
    pub rank: Option<usize>,
}

pub struct RankingService {
    config: AppConfig,
    engine: RankingEngine,
    validator: DrillValidator,
}

impl RankingService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let resolver = RangeResolver::with_capacity(config.scoring.range_cache_capacity);
        let validator = DrillValidator::new(config.validation.clone())?;
        Ok(Self {
            config,
            engine: RankingEngine::new(resolver),
            validator,
        })
    }

    pub fn schema(&self, snapshot: &EventSnapshot) -> EventDrillSchema {
        snapshot.schema(&self.validator)
    }

    /// Composite ranking of an event's players over its active drills.
    /// `overrides` replace single weights after the base weights are resolved.
    pub fn rank(
        &self,
        snapshot: &EventSnapshot,
        preset: Option<&str>,
        overrides: &[(String, f64)],
        scope: &RankingScope,
    ) -> Result<Vec<RankedResult>> {
        let schema = self.schema(snapshot);
        let drills = schema.active_drills();
        let mut weights = self.resolve_weights(snapshot, &drills, preset)?;
        apply_overrides(&mut weights, &drills, overrides)?;

        info!(
            "Ranking {} player(s) of event {} over {} drill(s)",
            snapshot.players.len(),
            snapshot.event_id,
            drills.len()
        );
        let results = self.engine.rank(&snapshot.players, &drills, &weights, scope);

        let stats = self.engine.resolver().cache().stats();
        debug!(
            "Range cache: {} hit(s), {} miss(es), {} eviction(s)",
            stats.hits, stats.misses, stats.evictions
        );
        Ok(results)
    }

    /// Preset weights win over the snapshot's own weights, which win over
    /// each drill's default weight.
    pub fn resolve_weights(
        &self,
        snapshot: &EventSnapshot,
        drills: &[DrillDefinition],
        preset: Option<&str>,
    ) -> Result<WeightConfiguration> {
        if let Some(preset_id) = preset {
            let template = snapshot
                .template
                .as_deref()
                .and_then(find_template)
                .unwrap_or_else(default_template);
            info!("Using preset '{}' of template {}", preset_id, template.id);
            return template
                .preset_weights(preset_id)
                .context("Failed to resolve weight preset");
        }

        if let Some(weights) = &snapshot.weights {
            debug!("Using weights from snapshot for event {}", snapshot.event_id);
            return Ok(weights.clone());
        }

        debug!("Using default drill weights for event {}", snapshot.event_id);
        WeightConfiguration::from_defaults(drills).context("Invalid default drill weights")
    }

    /// Scores formatted with the configured precision, never rescaled.
    pub fn export_rows(&self, results: &[RankedResult]) -> Vec<ExportRow> {
        let precision = self.config.scoring.score_precision;
        results
            .iter()
            .map(|r| ExportRow {
                rank: r.rank,
                player_id: r.player_id.clone(),
                age_group: r.age_group.clone(),
                composite_score: format!("{:.*}", precision, r.composite_score),
            })
            .collect()
    }

    /// Where one player stands on one drill within their age group.
    pub fn drill_standing(&self, snapshot: &EventSnapshot, drill_key: &str, player_id: &str) -> Result<DrillStanding> {
        let schema = self.schema(snapshot);
        let drill = find_drill(&schema, drill_key)?;
        let player = snapshot
            .players
            .iter()
            .find(|p| p.player_id == player_id)
            .with_context(|| format!("Player {} not found in event {}", player_id, snapshot.event_id))?;

        Ok(DrillStanding {
            player_id: player.player_id.clone(),
            drill_key: drill.key.clone(),
            value: player.score(&drill.key),
            rank: rank_single_drill(player, &snapshot.players, drill),
        })
    }

    pub fn leaderboard(
        &self,
        snapshot: &EventSnapshot,
        drill_key: &str,
        population: &Population,
    ) -> Result<Vec<DrillRankEntry>> {
        let schema = self.schema(snapshot);
        let drill = find_drill(&schema, drill_key)?;
        Ok(drill_leaderboard(&snapshot.players, drill, population))
    }
}

fn apply_overrides(
    weights: &mut WeightConfiguration,
    drills: &[DrillDefinition],
    overrides: &[(String, f64)],
) -> Result<()> {
    for (key, weight) in overrides {
        if !drills.iter().any(|d| &d.key == key) {
            warn!("Weight override for {} matches no active drill", key);
        }
        weights.set(key, *weight)?;
        debug!("Weight of {} set to {}", key, weight);
    }
    Ok(())
}

fn find_drill<'a>(schema: &'a EventDrillSchema, drill_key: &str) -> Result<&'a DrillDefinition> {
    let drill = schema
        .drill(drill_key)
        .ok_or_else(|| DrillError::DrillNotFound(drill_key.to_string()))?;
    Ok(drill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LiveEntryStatus, PlayerScoreRecord};

    fn snapshot(players: Vec<PlayerScoreRecord>) -> EventSnapshot {
        EventSnapshot {
            event_id: "e1".to_string(),
            template: Some("basketball".to_string()),
            status: LiveEntryStatus::Active,
            disabled_drills: vec![],
            custom_drills: vec![],
            external_drills: vec![],
            players,
            weights: None,
        }
    }

    fn golden_player() -> PlayerScoreRecord {
        PlayerScoreRecord::new("p1", "U18")
            .with_score("free_throws", 95.0)
            .with_score("three_point", 64.0)
            .with_score("vertical_jump", 40.0)
            .with_score("lane_agility", 12.26)
    }

    #[test]
    fn test_golden_export_row() {
        let mut snapshot = snapshot(vec![golden_player()]);
        snapshot.weights = Some(
            WeightConfiguration::new([
                ("free_throws", 0.2),
                ("three_point", 0.2),
                ("vertical_jump", 0.2),
                ("lane_agility", 0.15),
            ])
            .unwrap(),
        );
        let service = RankingService::new(AppConfig::new()).unwrap();

        let results = service.rank(&snapshot, None, &[], &RankingScope::ByAgeGroup).unwrap();
        let rows = service.export_rows(&results);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].composite_score, "76.63");
        assert_eq!(rows[0].rank, 1);
    }

    #[test]
    fn test_preset_overrides_snapshot_weights() {
        let mut snapshot = snapshot(vec![golden_player()]);
        snapshot.weights = Some(WeightConfiguration::new([("free_throws", 1.0)]).unwrap());
        let service = RankingService::new(AppConfig::new()).unwrap();
        let drills = service.schema(&snapshot).active_drills();

        let weights = service.resolve_weights(&snapshot, &drills, Some("shooter")).unwrap();
        assert_eq!(weights.get("free_throws"), 0.35);

        let from_snapshot = service.resolve_weights(&snapshot, &drills, None).unwrap();
        assert_eq!(from_snapshot.get("three_point"), 0.0);
    }

    #[test]
    fn test_weight_overrides_apply_on_top_of_preset() {
        let snapshot = snapshot(vec![
            PlayerScoreRecord::new("shooter", "U18")
                .with_score("free_throws", 95.0)
                .with_score("vertical_jump", 20.0),
            PlayerScoreRecord::new("leaper", "U18")
                .with_score("free_throws", 60.0)
                .with_score("vertical_jump", 40.0),
        ]);
        let service = RankingService::new(AppConfig::new()).unwrap();

        let by_preset = service.rank(&snapshot, Some("shooter"), &[], &RankingScope::Global).unwrap();
        assert_eq!(by_preset[0].player_id, "shooter");

        let overrides = vec![("free_throws".to_string(), 0.0)];
        let jump_only = service.rank(&snapshot, Some("shooter"), &overrides, &RankingScope::Global).unwrap();
        assert_eq!(jump_only[0].player_id, "leaper");

        let negative = vec![("free_throws".to_string(), -1.0)];
        assert!(service.rank(&snapshot, None, &negative, &RankingScope::Global).is_err());
    }

    #[test]
    fn test_unknown_preset_is_an_error() {
        let snapshot = snapshot(vec![]);
        let service = RankingService::new(AppConfig::new()).unwrap();
        assert!(service.rank(&snapshot, Some("sniper"), &[], &RankingScope::Global).is_err());
    }

    #[test]
    fn test_defaults_apply_without_weights() {
        let snapshot = snapshot(vec![]);
        let service = RankingService::new(AppConfig::new()).unwrap();
        let drills = service.schema(&snapshot).active_drills();
        let weights = service.resolve_weights(&snapshot, &drills, None).unwrap();
        assert_eq!(weights.get("lane_agility"), 0.15);
    }

    #[test]
    fn test_drill_standing_and_leaderboard() {
        let snapshot = snapshot(vec![
            golden_player(),
            PlayerScoreRecord::new("p2", "U18").with_score("free_throws", 97.0),
            PlayerScoreRecord::new("p3", "U18"),
        ]);
        let service = RankingService::new(AppConfig::new()).unwrap();

        let standing = service.drill_standing(&snapshot, "free_throws", "p1").unwrap();
        assert_eq!(standing.rank, Some(2));
        assert_eq!(standing.value, Some(95.0));

        let missing = service.drill_standing(&snapshot, "free_throws", "p3").unwrap();
        assert_eq!(missing.rank, None);

        let board = service.leaderboard(&snapshot, "free_throws", &Population::All).unwrap();
        assert_eq!(board[0].player_id, "p2");
        assert!(service.leaderboard(&snapshot, "nope", &Population::All).is_err());
        assert!(service.drill_standing(&snapshot, "free_throws", "ghost").is_err());
    }
}
