pub mod drill;
pub mod player;
pub mod schema;
pub mod weights;

pub use drill::{Direction, DrillCategory, DrillDefinition, DrillKey, DrillRange, DrillUnit};
pub use player::{PlayerId, PlayerScoreRecord, Population};
pub use schema::{EventDrillSchema, LiveEntryStatus};
pub use weights::WeightConfiguration;
