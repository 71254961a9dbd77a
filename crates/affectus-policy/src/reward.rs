//! Scalar reward from an observed `(state_before, state_after, desired_state)`
//! transition plus completion info.

use affectus_types::AffectState;

const PROXIMITY_BONUS: f64 = 0.10;
const PROXIMITY_THRESHOLD_DEFAULT: f64 = 0.30;

pub struct RewardBreakdown {
    pub direction_alignment: f64,
    pub magnitude: f64,
    pub base: f64,
    pub proximity_bonus: f64,
    pub completion_penalty: f64,
    pub total: f64,
}

pub struct RewardCalculator {
    proximity_threshold: f64,
}

impl RewardCalculator {
    pub fn new(proximity_threshold: f64) -> Self {
        Self { proximity_threshold }
    }

    pub fn compute(
        &self,
        state_before: &AffectState,
        state_after: &AffectState,
        desired: &AffectState,
        completed: bool,
        watch_duration: f64,
        total_duration: f64,
    ) -> RewardBreakdown {
        let actual = (state_after.valence - state_before.valence, state_after.arousal - state_before.arousal);
        let desired_delta = (desired.valence - state_before.valence, desired.arousal - state_before.arousal);

        let direction_alignment = cosine(actual, desired_delta);
        let magnitude = (magnitude_of(actual) / (2.0 * 2.0_f64.sqrt())).clamp(0.0, 1.0);
        let base = 0.6 * direction_alignment + 0.4 * magnitude;

        let distance = magnitude_of((state_after.valence - desired.valence, state_after.arousal - desired.arousal));
        let proximity_bonus = if distance < self.proximity_threshold { PROXIMITY_BONUS } else { 0.0 };

        let completion_penalty = if completed {
            0.0
        } else {
            let rate = if total_duration > 0.0 { watch_duration / total_duration } else { 0.0 };
            if rate < 0.20 {
                -0.20
            } else if rate < 0.50 {
                -0.10
            } else if rate < 0.80 {
                -0.05
            } else {
                0.0
            }
        };

        let total = (base + proximity_bonus + completion_penalty).clamp(-1.0, 1.0);

        RewardBreakdown {
            direction_alignment,
            magnitude,
            base,
            proximity_bonus,
            completion_penalty,
            total,
        }
    }
}

impl Default for RewardCalculator {
    fn default() -> Self {
        Self::new(PROXIMITY_THRESHOLD_DEFAULT)
    }
}

fn magnitude_of(v: (f64, f64)) -> f64 {
    (v.0 * v.0 + v.1 * v.1).sqrt()
}

/// Cosine similarity in 2-D; 0 when either vector has zero magnitude.
pub fn cosine(a: (f64, f64), b: (f64, f64)) -> f64 {
    let mag_a = magnitude_of(a);
    let mag_b = magnitude_of(b);
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    (a.0 * b.0 + a.1 * b.1) / (mag_a * mag_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(v: f64, a: f64, s: f64) -> AffectState {
        AffectState::new(v, a, s, 0.5).unwrap()
    }

    #[test]
    fn perfect_alignment_and_full_completion_yields_high_reward() {
        let calc = RewardCalculator::default();
        let before = state(0.0, 0.0, 0.5);
        let desired = state(0.5, 0.0, 0.5);
        let after = state(0.5, 0.0, 0.5);
        let breakdown = calc.compute(&before, &after, &desired, true, 30.0, 30.0);
        assert!((breakdown.direction_alignment - 1.0).abs() < 1e-9);
        assert_eq!(breakdown.completion_penalty, 0.0);
        assert!(breakdown.total > 0.5);
    }

    #[test]
    fn opposite_direction_is_penalized() {
        let calc = RewardCalculator::default();
        let before = state(0.0, 0.0, 0.5);
        let desired = state(0.5, 0.0, 0.5);
        let after = state(-0.5, 0.0, 0.5);
        let breakdown = calc.compute(&before, &after, &desired, true, 30.0, 30.0);
        assert!((breakdown.direction_alignment - -1.0).abs() < 1e-9);
    }

    #[test]
    fn low_watch_rate_applies_largest_penalty() {
        let calc = RewardCalculator::default();
        let before = state(0.0, 0.0, 0.5);
        let desired = state(0.0, 0.0, 0.5);
        let after = state(0.0, 0.0, 0.5);
        let breakdown = calc.compute(&before, &after, &desired, false, 5.0, 30.0);
        assert_eq!(breakdown.completion_penalty, -0.20);
    }

    #[test]
    fn reward_is_bounded() {
        let calc = RewardCalculator::default();
        let before = state(-1.0, -1.0, 1.0);
        let desired = state(1.0, 1.0, 0.0);
        let after = state(1.0, 1.0, 0.0);
        let breakdown = calc.compute(&before, &after, &desired, true, 30.0, 30.0);
        assert!(breakdown.total <= 1.0 && breakdown.total >= -1.0);
    }

    #[test]
    fn proximity_bonus_applies_within_threshold() {
        let calc = RewardCalculator::default();
        let before = state(0.0, 0.0, 0.5);
        let desired = state(0.5, 0.0, 0.5);
        let after = state(0.45, 0.0, 0.5);
        let breakdown = calc.compute(&before, &after, &desired, true, 30.0, 30.0);
        assert_eq!(breakdown.proximity_bonus, 0.10);
    }

    proptest::proptest! {
        #[test]
        fn reward_is_always_within_bounds(
            bv in -1.0f64..=1.0, ba in -1.0f64..=1.0,
            av in -1.0f64..=1.0, aa in -1.0f64..=1.0,
            dv in -1.0f64..=1.0, da in -1.0f64..=1.0,
            completed in proptest::bool::ANY,
            watch in 0.0f64..=120.0,
            total in 1.0f64..=120.0,
        ) {
            let calc = RewardCalculator::default();
            let before = state(bv, ba, 0.5);
            let after = state(av, aa, 0.5);
            let desired = state(dv, da, 0.5);
            let breakdown = calc.compute(&before, &after, &desired, completed, watch, total);
            proptest::prop_assert!(breakdown.total >= -1.0 && breakdown.total <= 1.0);
        }

        /// Scaling the actual movement further along the desired direction,
        /// without yet overshooting it, never decreases the base reward
        /// component (direction fixed, magnitude non-decreasing).
        #[test]
        fn increasing_movement_toward_desired_does_not_decrease_base_reward(
            bv in -0.5f64..=0.5, ba in -0.5f64..=0.5,
            dv in -0.5f64..=0.5, da in -0.5f64..=0.5,
            t1 in 0.0f64..=1.0, t2 in 0.0f64..=1.0,
        ) {
            let calc = RewardCalculator::default();
            let before = state(bv, ba, 0.5);
            let desired = state(bv + dv, ba + da, 0.5);
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

            let after_lo = state(bv + lo * dv, ba + lo * da, 0.5);
            let after_hi = state(bv + hi * dv, ba + hi * da, 0.5);

            let r_lo = calc.compute(&before, &after_lo, &desired, true, 30.0, 30.0);
            let r_hi = calc.compute(&before, &after_hi, &desired, true, 30.0, 30.0);

            // direction is identical for any t > 0 (same ray from `before`
            // toward `desired`); only magnitude grows, so base must not drop.
            proptest::prop_assert!(r_hi.base >= r_lo.base - 1e-9);
        }
    }
}
