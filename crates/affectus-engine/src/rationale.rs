//! Deterministic, template-based explanation for a single recommendation.
//!
//! Cites whichever of the two weighted ranking terms (learned policy value
//! vs. content similarity) contributed more to the combined score, plus the
//! dominant axis of the predicted outcome shift.

use affectus_policy::{PredictedOutcome, RankedItem};
use affectus_types::AffectState;

const Q_WEIGHT: f64 = 0.7;
const SIMILARITY_WEIGHT: f64 = 0.3;

pub fn generate(item: &RankedItem, outcome: &PredictedOutcome, current: &AffectState) -> String {
    let q_n = (item.q_value + 1.0) / 2.0;
    let q_contribution = Q_WEIGHT * q_n;
    let similarity_contribution = SIMILARITY_WEIGHT * item.similarity;

    let driver = if q_contribution >= similarity_contribution {
        "your past feedback on similar content"
    } else {
        "strong alignment with your current goal"
    };

    let valence_delta = outcome.valence - current.valence;
    let arousal_delta = outcome.arousal - current.arousal;

    let (axis, delta) = if valence_delta.abs() >= arousal_delta.abs() {
        ("valence", valence_delta)
    } else {
        ("arousal", arousal_delta)
    };

    let direction = if delta >= 0.0 { "raise" } else { "lower" };

    format!(
        "Chosen for {driver}; expected to {direction} {axis} by {:.2}.",
        delta.abs()
    )
}
