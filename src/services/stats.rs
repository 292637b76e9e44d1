use log::info;
use serde::Serialize;

use crate::domain::{DrillDefinition, PlayerScoreRecord, Population};
use crate::scoring::{drill_leaderboard, DrillRankEntry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillStats {
    pub drill_key: String,
    pub label: String,
    pub unit: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub count: usize,
    pub missing: usize,
    pub top_performers: Vec<DrillRankEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventStats {
    pub event_id: String,
    pub participant_count: usize,
    pub drills: Vec<DrillStats>,
}

/// Per-drill summary of an event. Top performers follow each drill's
/// direction.
pub fn calculate_event_stats(
    event_id: &str,
    drills: &[DrillDefinition],
    players: &[PlayerScoreRecord],
    top_performers: usize,
) -> EventStats {
    let drills: Vec<DrillStats> = drills
        .iter()
        .map(|drill| calculate_drill_stats(drill, players, top_performers))
        .collect();

    info!(
        "Calculated stats for event {}: {} participant(s), {} drill(s)",
        event_id,
        players.len(),
        drills.len()
    );

    EventStats {
        event_id: event_id.to_string(),
        participant_count: players.len(),
        drills,
    }
}

fn calculate_drill_stats(drill: &DrillDefinition, players: &[PlayerScoreRecord], top: usize) -> DrillStats {
    let values: Vec<f64> = players.iter().filter_map(|p| p.score(&drill.key)).collect();
    let count = values.len();

    let (min, max, mean) = if values.is_empty() {
        (None, None, None)
    } else {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count as f64;
        (Some(min), Some(max), Some(mean))
    };

    let mut top_performers = drill_leaderboard(players, drill, &Population::All);
    top_performers.truncate(top);

    DrillStats {
        drill_key: drill.key.clone(),
        label: drill.label.clone(),
        unit: drill.unit.to_string(),
        min,
        max,
        mean,
        count,
        missing: players.len() - count,
        top_performers,
    }
}
