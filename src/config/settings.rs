use log::warn;

const RANGE_CACHE_CAPACITY_ENV: &str = "COMBINE_RANGE_CACHE_CAPACITY";
const TOP_PERFORMERS_ENV: &str = "COMBINE_TOP_PERFORMERS";

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSettings {
    pub range_cache_capacity: usize,
    pub top_performers: usize,
    pub score_precision: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            range_cache_capacity: 256,
            top_performers: 3,
            score_precision: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSettings {
    pub label_min_len: usize,
    pub label_max_len: usize,
    pub custom_unit_max_len: usize,
    pub max_time_seconds: f64,
    pub max_time_minutes: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            label_min_len: 4,
            label_max_len: 40,
            custom_unit_max_len: 20,
            max_time_seconds: 120.0,
            max_time_minutes: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub validation: ValidationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            scoring: ScoringSettings::default(),
            validation: ValidationSettings::default(),
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(capacity) = parse_positive(RANGE_CACHE_CAPACITY_ENV, lookup(RANGE_CACHE_CAPACITY_ENV)) {
            self.scoring.range_cache_capacity = capacity;
        }
        if let Some(count) = parse_positive(TOP_PERFORMERS_ENV, lookup(TOP_PERFORMERS_ENV)) {
            self.scoring.top_performers = count;
        }
    }
}

fn parse_positive(name: &str, value: Option<String>) -> Option<usize> {
    let raw = value?;
    match raw.trim().parse::<usize>() {
        Ok(parsed) if parsed > 0 => Some(parsed),
        _ => {
            warn!("Ignoring {}={:?}: expected a positive integer", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_defaults() {
        let mut config = AppConfig::new();
        config.apply_overrides(|name| match name {
            RANGE_CACHE_CAPACITY_ENV => Some("32".to_string()),
            TOP_PERFORMERS_ENV => Some("5".to_string()),
            _ => None,
        });
        assert_eq!(config.scoring.range_cache_capacity, 32);
        assert_eq!(config.scoring.top_performers, 5);
    }

    #[test]
    fn test_invalid_overrides_keep_defaults() {
        let mut config = AppConfig::new();
        config.apply_overrides(|name| match name {
            RANGE_CACHE_CAPACITY_ENV => Some("0".to_string()),
            TOP_PERFORMERS_ENV => Some("lots".to_string()),
            _ => None,
        });
        assert_eq!(config.scoring, ScoringSettings::default());
    }
}
