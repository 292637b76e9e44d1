use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use log::debug;

use super::range::RangeResolver;
use super::types::{DrillRankEntry, RankedResult};
use super::weighting::aggregate;
use crate::domain::{
    Direction, DrillDefinition, DrillKey, DrillRange, PlayerScoreRecord, Population, WeightConfiguration,
};

/// How players are grouped before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingScope {
    /// Independent ranking inside every age group, groups in name order.
    ByAgeGroup,
    /// One ranking over every player.
    Global,
    /// Only the named age group.
    AgeGroup(String),
}

impl RankingScope {
    /// `None` ranks every age group separately; `ALL` in any case is global.
    pub fn parse(age_group: Option<&str>) -> Self {
        match age_group.map(Population::parse) {
            None => RankingScope::ByAgeGroup,
            Some(Population::All) => RankingScope::Global,
            Some(Population::AgeGroup(group)) => RankingScope::AgeGroup(group),
        }
    }

    fn populations(&self, players: &[PlayerScoreRecord]) -> Vec<Population> {
        match self {
            RankingScope::Global => vec![Population::All],
            RankingScope::AgeGroup(group) => vec![Population::AgeGroup(group.clone())],
            RankingScope::ByAgeGroup => players
                .iter()
                .map(|p| p.age_group.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(Population::AgeGroup)
                .collect(),
        }
    }
}

pub struct RankingEngine {
    resolver: RangeResolver,
}

impl RankingEngine {
    pub fn new(resolver: RangeResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &RangeResolver {
        &self.resolver
    }

    /// Composite ranking of `players` over `drills`.
    ///
    /// Each population is ranked on its own: ranges are resolved within it,
    /// players without any recorded drill are left out, and ranks run
    /// `1..=n` in descending score order with ties broken by player id.
    pub fn rank(
        &self,
        players: &[PlayerScoreRecord],
        drills: &[DrillDefinition],
        weights: &WeightConfiguration,
        scope: &RankingScope,
    ) -> Vec<RankedResult> {
        scope
            .populations(players)
            .iter()
            .flat_map(|population| self.rank_population(players, drills, weights, population))
            .collect()
    }

    fn rank_population(
        &self,
        players: &[PlayerScoreRecord],
        drills: &[DrillDefinition],
        weights: &WeightConfiguration,
        population: &Population,
    ) -> Vec<RankedResult> {
        let ranges = self.resolve_ranges(drills, population, players);

        let mut scored: Vec<(&PlayerScoreRecord, f64)> = players
            .iter()
            .filter(|p| population.contains(p))
            .filter(|p| p.recorded_count(drills) > 0)
            .map(|p| (p, aggregate(p, drills, weights, &ranges)))
            .collect();

        scored.sort_by(|(a, score_a), (b, score_b)| {
            score_b
                .total_cmp(score_a)
                .then_with(|| a.player_id.cmp(&b.player_id))
        });
        debug!("Ranked {} player(s) in {}", scored.len(), population);

        scored
            .into_iter()
            .enumerate()
            .map(|(index, (player, composite_score))| RankedResult {
                player_id: player.player_id.clone(),
                age_group: player.age_group.clone(),
                composite_score,
                rank: index + 1,
            })
            .collect()
    }

    fn resolve_ranges(
        &self,
        drills: &[DrillDefinition],
        population: &Population,
        players: &[PlayerScoreRecord],
    ) -> HashMap<DrillKey, DrillRange> {
        drills
            .iter()
            .map(|d| (d.key.clone(), self.resolver.resolve_range(d, population, players)))
            .collect()
    }
}

/// Rank of `player` on one drill among the same age group, or `None` when
/// the player has no value for it.
pub fn rank_single_drill(
    player: &PlayerScoreRecord,
    players: &[PlayerScoreRecord],
    drill: &DrillDefinition,
) -> Option<usize> {
    let value = player.score(&drill.key)?;

    let ahead = players
        .iter()
        .filter(|other| other.age_group == player.age_group && other.player_id != player.player_id)
        .filter_map(|other| other.score(&drill.key).map(|v| (other, v)))
        .filter(|(other, v)| {
            compare_values(drill.direction, *v, value)
                .then_with(|| other.player_id.cmp(&player.player_id))
                == Ordering::Less
        })
        .count();

    Some(ahead + 1)
}

/// Every recorded value for `drill` within `population`, best first.
pub fn drill_leaderboard(
    players: &[PlayerScoreRecord],
    drill: &DrillDefinition,
    population: &Population,
) -> Vec<DrillRankEntry> {
    let mut entries: Vec<(&PlayerScoreRecord, f64)> = players
        .iter()
        .filter(|p| population.contains(p))
        .filter_map(|p| p.score(&drill.key).map(|v| (p, v)))
        .collect();

    entries.sort_by(|(a, value_a), (b, value_b)| {
        compare_values(drill.direction, *value_a, *value_b).then_with(|| a.player_id.cmp(&b.player_id))
    });

    entries
        .into_iter()
        .enumerate()
        .map(|(index, (player, value))| DrillRankEntry {
            player_id: player.player_id.clone(),
            age_group: player.age_group.clone(),
            drill_key: drill.key.clone(),
            value,
            rank: index + 1,
        })
        .collect()
}

/// `Less` when `a` is the better performance.
fn compare_values(direction: Direction, a: f64, b: f64) -> Ordering {
    match direction {
        Direction::LowerIsBetter => a.total_cmp(&b),
        Direction::HigherIsBetter => b.total_cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DrillCategory, DrillUnit};

    fn engine() -> RankingEngine {
        RankingEngine::new(RangeResolver::with_capacity(16))
    }

    fn sprint() -> DrillDefinition {
        DrillDefinition::builtin(
            "sprint",
            "40-Yard Sprint",
            DrillUnit::Seconds,
            DrillCategory::Speed,
            Direction::LowerIsBetter,
        )
    }

    fn jump() -> DrillDefinition {
        DrillDefinition::builtin(
            "vertical_jump",
            "Vertical Jump",
            DrillUnit::Inches,
            DrillCategory::Power,
            Direction::HigherIsBetter,
        )
    }

    fn sprint_weights() -> WeightConfiguration {
        WeightConfiguration::new([("sprint", 1.0)]).unwrap()
    }

    #[test]
    fn test_sprint_end_to_end() {
        let drills = vec![sprint().with_range(5.0, 10.0)];
        let players = vec![
            PlayerScoreRecord::new("p2", "U12").with_score("sprint", 8.0),
            PlayerScoreRecord::new("p1", "U12").with_score("sprint", 6.0),
        ];

        let results = engine().rank(&players, &drills, &sprint_weights(), &RankingScope::ByAgeGroup);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].player_id, "p1");
        assert_eq!(results[0].rank, 1);
        assert!((results[0].composite_score - 80.0).abs() < 1e-9);
        assert_eq!(results[1].player_id, "p2");
        assert_eq!(results[1].rank, 2);
        assert!((results[1].composite_score - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_age_groups_are_ranked_independently() {
        let drills = vec![sprint()];
        let players = vec![
            PlayerScoreRecord::new("a", "U14").with_score("sprint", 5.0),
            PlayerScoreRecord::new("b", "U12").with_score("sprint", 7.0),
            PlayerScoreRecord::new("c", "U12").with_score("sprint", 6.0),
            PlayerScoreRecord::new("d", "U14").with_score("sprint", 9.0),
            PlayerScoreRecord::new("e", "U12").with_score("sprint", 8.0),
        ];

        let results = engine().rank(&players, &drills, &sprint_weights(), &RankingScope::ByAgeGroup);
        let order: Vec<(&str, &str, usize)> = results
            .iter()
            .map(|r| (r.age_group.as_str(), r.player_id.as_str(), r.rank))
            .collect();

        assert_eq!(
            order,
            vec![
                ("U12", "c", 1),
                ("U12", "b", 2),
                ("U12", "e", 3),
                ("U14", "a", 1),
                ("U14", "d", 2),
            ]
        );
        for group in ["U12", "U14"] {
            let scores: Vec<f64> = results
                .iter()
                .filter(|r| r.age_group == group)
                .map(|r| r.composite_score)
                .collect();
            assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn test_global_scope_uses_population_wide_ranges() {
        let drills = vec![sprint()];
        let players = vec![
            PlayerScoreRecord::new("a", "U12").with_score("sprint", 6.0),
            PlayerScoreRecord::new("b", "U14").with_score("sprint", 5.0),
            PlayerScoreRecord::new("c", "U12").with_score("sprint", 10.0),
        ];

        let results = engine().rank(&players, &drills, &sprint_weights(), &RankingScope::parse(Some("all")));
        let ids: Vec<&str> = results.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!((results[1].composite_score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_age_group_scope() {
        let drills = vec![sprint()];
        let players = vec![
            PlayerScoreRecord::new("a", "U12").with_score("sprint", 6.0),
            PlayerScoreRecord::new("b", "U14").with_score("sprint", 5.0),
        ];

        let results = engine().rank(&players, &drills, &sprint_weights(), &RankingScope::parse(Some("U14")));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].player_id, "b");
        assert_eq!(results[0].rank, 1);
    }

    #[test]
    fn test_ties_break_by_player_id() {
        let drills = vec![sprint().with_range(5.0, 10.0)];
        let players = vec![
            PlayerScoreRecord::new("zed", "U12").with_score("sprint", 6.0),
            PlayerScoreRecord::new("amy", "U12").with_score("sprint", 6.0),
        ];

        let results = engine().rank(&players, &drills, &sprint_weights(), &RankingScope::ByAgeGroup);
        assert_eq!(results[0].player_id, "amy");
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].player_id, "zed");
        assert_eq!(results[1].rank, 2);
    }

    #[test]
    fn test_players_without_recorded_drills_are_excluded() {
        let drills = vec![sprint(), jump()];
        let weights = WeightConfiguration::new([("sprint", 1.0), ("vertical_jump", 1.0)]).unwrap();
        let players = vec![
            PlayerScoreRecord::new("a", "U12").with_score("sprint", 6.0),
            PlayerScoreRecord::new("b", "U12").with_score("vertical_jump", 20.0),
            PlayerScoreRecord::new("c", "U12").with_score("shuttle", 4.0),
        ];

        let results = engine().rank(&players, &drills, &weights, &RankingScope::ByAgeGroup);
        let ids: Vec<&str> = results.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&"c"));
    }

    #[test]
    fn test_rank_single_drill_by_direction() {
        let players = vec![
            PlayerScoreRecord::new("a", "U12").with_score("sprint", 6.0).with_score("vertical_jump", 18.0),
            PlayerScoreRecord::new("b", "U12").with_score("sprint", 5.5).with_score("vertical_jump", 22.0),
            PlayerScoreRecord::new("c", "U14").with_score("sprint", 4.0),
            PlayerScoreRecord::new("d", "U12"),
        ];

        assert_eq!(rank_single_drill(&players[0], &players, &sprint()), Some(2));
        assert_eq!(rank_single_drill(&players[1], &players, &sprint()), Some(1));
        assert_eq!(rank_single_drill(&players[0], &players, &jump()), Some(2));
        assert_eq!(rank_single_drill(&players[2], &players, &sprint()), Some(1));
        assert_eq!(rank_single_drill(&players[3], &players, &sprint()), None);
    }

    #[test]
    fn test_drill_leaderboard_orders_best_first() {
        let players = vec![
            PlayerScoreRecord::new("a", "U12").with_score("vertical_jump", 18.0),
            PlayerScoreRecord::new("b", "U14").with_score("vertical_jump", 25.0),
            PlayerScoreRecord::new("c", "U12").with_score("vertical_jump", 22.0),
            PlayerScoreRecord::new("d", "U12"),
        ];

        let board = drill_leaderboard(&players, &jump(), &Population::All);
        let ids: Vec<(&str, usize)> = board.iter().map(|e| (e.player_id.as_str(), e.rank)).collect();
        assert_eq!(ids, vec![("b", 1), ("c", 2), ("a", 3)]);

        let u12 = drill_leaderboard(&players, &jump(), &Population::parse("U12"));
        assert_eq!(u12.len(), 2);
        assert_eq!(u12[0].player_id, "c");
    }
}
