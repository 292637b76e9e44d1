pub mod ranking;
pub mod snapshot;
pub mod stats;

pub use ranking::{DrillStanding, ExportRow, RankingService};
pub use snapshot::{load_snapshot, write_json, EventSnapshot};
pub use stats::{calculate_event_stats, DrillStats, EventStats};
