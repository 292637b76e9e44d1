pub mod normalization;
pub mod range;
pub mod range_cache;
pub mod ranking;
pub mod types;
pub mod weighting;

pub use normalization::{clamp_for_display, normalize};
pub use range::RangeResolver;
pub use range_cache::{CacheStats, EvictOldestHalf, EvictionPolicy, Fingerprint, RangeCache, RangeKey};
pub use ranking::{drill_leaderboard, rank_single_drill, RankingEngine, RankingScope};
pub use types::{DrillRankEntry, RankedResult};
pub use weighting::aggregate;
