use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use log::debug;

use super::range_cache::{Fingerprint, RangeCache, RangeKey};
use crate::domain::{DrillDefinition, DrillRange, PlayerScoreRecord, Population};

/// Resolves the interval a drill is normalized against.
///
/// Explicit schema ranges win. Otherwise the observed min/max of the
/// population is scanned, memoized in the injected cache.
#[derive(Clone)]
pub struct RangeResolver {
    cache: Arc<RangeCache>,
}

impl RangeResolver {
    pub fn new(cache: Arc<RangeCache>) -> Self {
        Self { cache }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Arc::new(RangeCache::new(capacity)))
    }

    pub fn cache(&self) -> &RangeCache {
        &self.cache
    }

    pub fn resolve_range(
        &self,
        drill: &DrillDefinition,
        population: &Population,
        players: &[PlayerScoreRecord],
    ) -> DrillRange {
        if let Some(range) = drill.explicit_range() {
            return range;
        }

        let members = recorded_values(drill, population, players);
        if members.is_empty() {
            return DrillRange::UNBOUNDED;
        }

        let fingerprint = fingerprint(population, &drill.key, &members);
        let key = RangeKey::new(population, &drill.key, members.len());
        if let Some(range) = self.cache.get(fingerprint, &key) {
            return range;
        }

        let range = observed_range(&members);
        debug!(
            "Scanned range for {} in {}: [{}, {}] over {} value(s)",
            drill.key,
            population,
            range.min,
            range.max,
            members.len()
        );
        self.cache.insert(fingerprint, key, range);
        range
    }
}

fn recorded_values<'a>(
    drill: &DrillDefinition,
    population: &Population,
    players: &'a [PlayerScoreRecord],
) -> Vec<(&'a str, f64)> {
    players
        .iter()
        .filter(|p| population.contains(p))
        .filter_map(|p| p.score(&drill.key).map(|v| (p.player_id.as_str(), v)))
        .collect()
}

fn observed_range(members: &[(&str, f64)]) -> DrillRange {
    let (min, max) = members
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (_, v)| {
            (min.min(*v), max.max(*v))
        });
    DrillRange::new(min, max)
}

/// Identity of a range scan: population, drill, the members holding a value
/// and the values themselves, each sorted so input order does not matter.
pub fn fingerprint(population: &Population, drill_key: &str, members: &[(&str, f64)]) -> Fingerprint {
    let mut ids: Vec<&str> = members.iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();

    let mut values: Vec<f64> = members.iter().map(|(_, v)| *v).collect();
    values.sort_by(f64::total_cmp);

    let mut hasher = DefaultHasher::new();
    population.hash(&mut hasher);
    drill_key.hash(&mut hasher);
    ids.hash(&mut hasher);
    for value in values {
        value.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, DrillCategory, DrillUnit};
    use proptest::prelude::*;

    fn sprint() -> DrillDefinition {
        DrillDefinition::builtin(
            "sprint",
            "40-Yard Sprint",
            DrillUnit::Seconds,
            DrillCategory::Speed,
            Direction::LowerIsBetter,
        )
    }

    fn players() -> Vec<PlayerScoreRecord> {
        vec![
            PlayerScoreRecord::new("a", "U12").with_score("sprint", 5.0),
            PlayerScoreRecord::new("b", "U12").with_score("sprint", 10.0),
            PlayerScoreRecord::new("c", "U14").with_score("sprint", 4.0),
            PlayerScoreRecord::new("d", "U12"),
        ]
    }

    #[test]
    fn test_explicit_range_bypasses_cache() {
        let resolver = RangeResolver::with_capacity(8);
        let drill = sprint().with_range(3.0, 9.0);
        let range = resolver.resolve_range(&drill, &Population::All, &players());

        assert_eq!(range, DrillRange::new(3.0, 9.0));
        assert_eq!(resolver.cache().stats().misses, 0);
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_observed_range_is_scoped_to_population() {
        let resolver = RangeResolver::with_capacity(8);
        let players = players();

        let u12 = resolver.resolve_range(&sprint(), &Population::parse("U12"), &players);
        assert_eq!(u12, DrillRange::new(5.0, 10.0));
        let all = resolver.resolve_range(&sprint(), &Population::All, &players);
        assert_eq!(all, DrillRange::new(4.0, 10.0));
    }

    #[test]
    fn test_no_recorded_values_is_unbounded() {
        let resolver = RangeResolver::with_capacity(8);
        let range = resolver.resolve_range(&sprint(), &Population::parse("U16"), &players());
        assert_eq!(range, DrillRange::UNBOUNDED);
    }

    #[test]
    fn test_repeat_scan_hits_cache() {
        let resolver = RangeResolver::with_capacity(8);
        let players = players();
        resolver.resolve_range(&sprint(), &Population::All, &players);
        resolver.resolve_range(&sprint(), &Population::All, &players);

        let stats = resolver.cache().stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_changed_values_miss_the_cache() {
        let resolver = RangeResolver::with_capacity(8);
        let mut players = players();
        resolver.resolve_range(&sprint(), &Population::All, &players);

        players[0].record("sprint", 3.5);
        let range = resolver.resolve_range(&sprint(), &Population::All, &players);
        assert_eq!(range, DrillRange::new(3.5, 10.0));
    }

    #[test]
    fn test_fingerprint_ignores_member_order() {
        let forward = [("a", 1.0), ("b", 2.0)];
        let backward = [("b", 2.0), ("a", 1.0)];
        assert_eq!(
            fingerprint(&Population::All, "sprint", &forward),
            fingerprint(&Population::All, "sprint", &backward)
        );
        assert_ne!(
            fingerprint(&Population::All, "sprint", &forward),
            fingerprint(&Population::All, "jump", &forward)
        );
    }

    proptest! {
        #[test]
        fn prop_cache_never_changes_result(
            scores in proptest::collection::vec((0usize..3, proptest::option::of(0.0..100.0f64)), 0..40),
        ) {
            let players: Vec<PlayerScoreRecord> = scores
                .iter()
                .enumerate()
                .map(|(i, (group, value))| {
                    let record = PlayerScoreRecord::new(&format!("p{}", i), &format!("U{}", 10 + group * 2));
                    match value {
                        Some(v) => record.with_score("sprint", *v),
                        None => record,
                    }
                })
                .collect();

            let cached = RangeResolver::with_capacity(2);
            for population in [Population::All, Population::parse("U10"), Population::parse("U12")] {
                let first = cached.resolve_range(&sprint(), &population, &players);
                let fresh = RangeResolver::with_capacity(2).resolve_range(&sprint(), &population, &players);
                cached.cache().clear();
                let after_clear = cached.resolve_range(&sprint(), &population, &players);

                prop_assert_eq!(first, fresh);
                prop_assert_eq!(first, after_clear);
            }
        }
    }
}
