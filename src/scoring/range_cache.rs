use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use serde::Serialize;

use crate::domain::{DrillKey, DrillRange, Population};

pub type Fingerprint = u64;

/// What a cached range was computed for. Stored next to the range and
/// compared on lookup, so a fingerprint collision reads as a miss.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeKey {
    pub population: Population,
    pub drill_key: DrillKey,
    pub members: usize,
}

impl RangeKey {
    pub fn new(population: &Population, drill_key: &str, members: usize) -> Self {
        Self {
            population: population.clone(),
            drill_key: drill_key.to_string(),
            members,
        }
    }
}

/// Chooses which entries leave the cache once it grows past capacity.
///
/// `entries` holds every cached fingerprint with its insertion sequence
/// number; smaller numbers were inserted earlier.
pub trait EvictionPolicy: Send + Sync {
    fn select_victims(&self, entries: &[(Fingerprint, u64)], capacity: usize) -> Vec<Fingerprint>;
}

/// Drops the older half of the cache in one batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvictOldestHalf;

impl EvictionPolicy for EvictOldestHalf {
    fn select_victims(&self, entries: &[(Fingerprint, u64)], _capacity: usize) -> Vec<Fingerprint> {
        let mut ordered = entries.to_vec();
        ordered.sort_by_key(|(_, sequence)| *sequence);

        let count = (ordered.len() / 2).max(1);
        ordered.into_iter().take(count).map(|(fp, _)| fp).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct CacheEntry {
    key: RangeKey,
    range: DrillRange,
    sequence: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<Fingerprint, CacheEntry>,
    next_sequence: u64,
    stats: CacheStats,
}

/// Bounded memo of observed drill ranges, shareable across threads.
///
/// Entries are idempotent: two threads missing on the same fingerprint both
/// compute and store the same range.
pub struct RangeCache {
    capacity: usize,
    policy: Box<dyn EvictionPolicy>,
    state: Mutex<CacheState>,
}

impl RangeCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, Box::new(EvictOldestHalf))
    }

    pub fn with_policy(capacity: usize, policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            capacity: capacity.max(1),
            policy,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn get(&self, fingerprint: Fingerprint, key: &RangeKey) -> Option<DrillRange> {
        let mut state = self.lock();
        let found = state
            .entries
            .get(&fingerprint)
            .filter(|entry| entry.key == *key)
            .map(|entry| entry.range);
        match found {
            Some(_) => state.stats.hits += 1,
            None => state.stats.misses += 1,
        }
        found
    }

    pub fn insert(&self, fingerprint: Fingerprint, key: RangeKey, range: DrillRange) {
        let mut state = self.lock();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.insert(fingerprint, CacheEntry { key, range, sequence });

        if state.entries.len() > self.capacity {
            self.evict(&mut state);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.lock().entries.contains_key(&fingerprint)
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        debug!("Range cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn evict(&self, state: &mut CacheState) {
        let entries: Vec<(Fingerprint, u64)> = state
            .entries
            .iter()
            .map(|(fp, entry)| (*fp, entry.sequence))
            .collect();

        let victims = self.policy.select_victims(&entries, self.capacity);
        for victim in &victims {
            state.entries.remove(victim);
        }
        state.stats.evictions += victims.len() as u64;
        debug!(
            "Range cache evicted {} entries, {} remain",
            victims.len(),
            state.entries.len()
        );
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RangeCache {
    fn default() -> Self {
        Self::new(crate::config::ScoringSettings::default().range_cache_capacity)
    }
}
