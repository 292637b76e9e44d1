pub mod guard;
pub mod validation;

pub use guard::{activate_live_entry, DrillLifecycleGuard};
pub use validation::{CustomDrillRequest, DrillPatch, DrillValidator, RangeWarning, ValidatedDrill};
