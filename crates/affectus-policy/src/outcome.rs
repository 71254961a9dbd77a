//! Predicts the affect state a piece of content is likely to produce, given
//! a user's current state and the content's profile. Pure, no state.

use affectus_types::{AffectState, ContentProfile};

pub struct PredictedOutcome {
    pub valence: f64,
    pub arousal: f64,
    pub stress: f64,
    pub confidence: f64,
}

pub fn predict(current: &AffectState, profile: &ContentProfile) -> PredictedOutcome {
    PredictedOutcome {
        valence: (current.valence + profile.valence_delta).clamp(-1.0, 1.0),
        arousal: (current.arousal + profile.arousal_delta).clamp(-1.0, 1.0),
        stress: (current.stress - 0.3 * profile.intensity).clamp(0.0, 1.0),
        confidence: (0.70 - 0.20 * profile.complexity).clamp(0.30, 0.95),
    }
}
