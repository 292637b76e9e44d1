use serde::{Deserialize, Serialize};

use crate::domain::{DrillKey, PlayerId};

/// One player's place in a ranking. Ephemeral: recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub player_id: PlayerId,
    pub age_group: String,
    pub composite_score: f64,
    pub rank: usize,
}

/// A single recorded value on a drill leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillRankEntry {
    pub player_id: PlayerId,
    pub age_group: String,
    pub drill_key: DrillKey,
    pub value: f64,
    pub rank: usize,
}
