pub mod assembly;
pub mod merge;

pub use assembly::{assemble_event_schema, SchemaSources};
pub use merge::{merge_drill, merge_schema, ExternalDrillDefinition};
