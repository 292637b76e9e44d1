pub mod settings;
pub mod templates;

pub use settings::{AppConfig, ScoringSettings, ValidationSettings};
pub use templates::{default_template, find_template, get_templates, Preset, SportTemplate, DEFAULT_TEMPLATE_ID};
