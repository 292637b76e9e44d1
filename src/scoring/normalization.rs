use crate::domain::{Direction, DrillRange};

/// Score assigned to every value when the whole population recorded the same
/// result.
pub const DEGENERATE_SCORE: f64 = 50.0;

/// Maps a raw drill value onto the 0-100 scale of `range`, where 100 is the
/// best end for `direction`.
///
/// Absent values and unbounded ranges score 0. The result is not clamped, so
/// values outside an explicit range land outside 0-100.
pub fn normalize(raw: Option<f64>, range: DrillRange, direction: Direction) -> f64 {
    let raw = match raw {
        Some(value) if value.is_finite() => value,
        _ => return 0.0,
    };
    if !range.is_bounded() {
        return 0.0;
    }
    if range.is_degenerate() {
        return DEGENERATE_SCORE;
    }

    match direction {
        Direction::HigherIsBetter => 100.0 * (raw - range.min) / range.span(),
        Direction::LowerIsBetter => 100.0 * (range.max - raw) / range.span(),
    }
}

/// Presentation helper; scoring itself never clamps.
pub fn clamp_for_display(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_sprint_examples() {
        let range = DrillRange::new(5.0, 10.0);
        assert!((normalize(Some(6.0), range, Direction::LowerIsBetter) - 80.0).abs() < EPSILON);
        assert!((normalize(Some(8.0), range, Direction::LowerIsBetter) - 40.0).abs() < EPSILON);
        assert!((normalize(Some(6.0), range, Direction::HigherIsBetter) - 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_absent_and_unbounded_score_zero() {
        let range = DrillRange::new(0.0, 10.0);
        assert_eq!(normalize(None, range, Direction::HigherIsBetter), 0.0);
        assert_eq!(normalize(Some(f64::NAN), range, Direction::HigherIsBetter), 0.0);
        assert_eq!(normalize(Some(5.0), DrillRange::UNBOUNDED, Direction::HigherIsBetter), 0.0);
    }

    #[test]
    fn test_out_of_range_values_are_not_clamped() {
        let range = DrillRange::new(0.0, 50.0);
        assert_eq!(normalize(Some(60.0), range, Direction::HigherIsBetter), 120.0);
        assert_eq!(clamp_for_display(120.0), 100.0);
        assert_eq!(clamp_for_display(-3.0), 0.0);
        assert_eq!(clamp_for_display(f64::NAN), 0.0);
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::HigherIsBetter), Just(Direction::LowerIsBetter)]
    }

    proptest! {
        #[test]
        fn prop_in_range_values_stay_within_bounds(
            min in -1.0e6..1.0e6f64,
            span in 1.0e-3..1.0e6f64,
            t in 0.0..=1.0f64,
            direction in direction(),
        ) {
            let range = DrillRange::new(min, min + span);
            let raw = (min + t * span).clamp(range.min, range.max);
            let score = normalize(Some(raw), range, direction);
            prop_assert!(score >= -EPSILON && score <= 100.0 + EPSILON, "score {}", score);
        }

        #[test]
        fn prop_better_raw_never_scores_lower(
            min in -1.0e4..1.0e4f64,
            span in 1.0e-2..1.0e4f64,
            a in 0.0..=1.0f64,
            b in 0.0..=1.0f64,
        ) {
            let range = DrillRange::new(min, min + span);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let (low, high) = (min + low * span, min + high * span);

            prop_assert!(
                normalize(Some(low), range, Direction::HigherIsBetter)
                    <= normalize(Some(high), range, Direction::HigherIsBetter)
            );
            prop_assert!(
                normalize(Some(low), range, Direction::LowerIsBetter)
                    >= normalize(Some(high), range, Direction::LowerIsBetter)
            );
        }

        #[test]
        fn prop_degenerate_range_scores_fifty(
            value in -1.0e6..1.0e6f64,
            raw in -1.0e6..1.0e6f64,
            direction in direction(),
        ) {
            let range = DrillRange::new(value, value);
            prop_assert_eq!(normalize(Some(raw), range, direction), DEGENERATE_SCORE);
        }
    }
}
