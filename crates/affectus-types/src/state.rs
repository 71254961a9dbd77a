//! Affect state, the discrete state key lattice, and desired-state types.
//!
//! Bucketing lives here rather than in a standalone crate: both the policy
//! and engine crates need `state_key()` and neither should depend on the
//! embedding/retrieval crate to get it.

use serde::{Deserialize, Serialize};
use std::fmt;

fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// Continuous affect state: valence/arousal in [-1,1], stress in [0,1],
/// confidence in [0,1]. Construction always clamps to the documented domain;
/// the only rejection condition is a non-finite input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffectState {
    pub valence: f64,
    pub arousal: f64,
    pub stress: f64,
    pub confidence: f64,
}

impl AffectState {
    /// Construct, clamping each axis into its domain. Returns `None` if any
    /// axis is non-finite (NaN/inf) — those are rejected, never clamped.
    pub fn new(valence: f64, arousal: f64, stress: f64, confidence: f64) -> Option<Self> {
        if ![valence, arousal, stress, confidence]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }
        Some(Self {
            valence: clamp(valence, -1.0, 1.0),
            arousal: clamp(arousal, -1.0, 1.0),
            stress: clamp(stress, 0.0, 1.0),
            confidence: clamp(confidence, 0.0, 1.0),
        })
    }

    /// Map to the discrete 5x5x3 lattice cell.
    ///
    /// `v_bucket = floor(((v+1)/2) * 5)` clamped to [0,4], same for arousal;
    /// `s_bucket = floor(stress * 3)` clamped to [0,2]. Left-closed,
    /// right-open on every axis except the upper boundary, which folds into
    /// the last bucket.
    pub fn state_key(&self) -> StateKey {
        let v_bucket = bucket(((self.valence + 1.0) / 2.0) * 5.0, 4);
        let a_bucket = bucket(((self.arousal + 1.0) / 2.0) * 5.0, 4);
        let s_bucket = bucket(self.stress * 3.0, 2);
        StateKey {
            v_bucket,
            a_bucket,
            s_bucket,
        }
    }
}

fn bucket(raw: f64, max_index: u8) -> u8 {
    let idx = raw.floor();
    if idx < 0.0 {
        0
    } else if idx > max_index as f64 {
        max_index
    } else {
        idx as u8
    }
}

/// Deterministic discrete encoding of an `AffectState`. Aliasing of nearby
/// continuous states onto the same key is intentional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    pub v_bucket: u8,
    pub a_bucket: u8,
    pub s_bucket: u8,
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.v_bucket, self.a_bucket, self.s_bucket)
    }
}

impl StateKey {
    /// Every valid `StateKey` fits in one of the 75 lattice cells.
    pub const CELL_COUNT: usize = 5 * 5 * 3;

    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

/// How strongly the desired state should differ from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Subtle,
    Moderate,
    Significant,
}

/// Target affect state for the current recommendation step, derived by a
/// priority rule table or supplied by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredState {
    pub target_valence: f64,
    pub target_arousal: f64,
    pub target_stress: f64,
    pub intensity: Intensity,
    pub reason: String,
}

impl DesiredState {
    pub fn new(
        target_valence: f64,
        target_arousal: f64,
        target_stress: f64,
        intensity: Intensity,
        reason: impl Into<String>,
    ) -> Option<Self> {
        if ![target_valence, target_arousal, target_stress]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }
        Some(Self {
            target_valence: clamp(target_valence, -1.0, 1.0),
            target_arousal: clamp(target_arousal, -1.0, 1.0),
            target_stress: clamp(target_stress, 0.0, 1.0),
            intensity,
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_inputs() {
        let s = AffectState::new(5.0, -5.0, 2.0, -1.0).unwrap();
        assert_eq!(s.valence, 1.0);
        assert_eq!(s.arousal, -1.0);
        assert_eq!(s.stress, 1.0);
        assert_eq!(s.confidence, 0.0);
    }

    #[test]
    fn rejects_non_finite() {
        assert!(AffectState::new(f64::NAN, 0.0, 0.0, 0.0).is_none());
        assert!(AffectState::new(0.0, f64::INFINITY, 0.0, 0.0).is_none());
    }

    #[test]
    fn state_key_covers_full_lattice_at_boundaries() {
        // lower boundary
        let low = AffectState::new(-1.0, -1.0, 0.0, 0.5).unwrap();
        assert_eq!(low.state_key(), StateKey { v_bucket: 0, a_bucket: 0, s_bucket: 0 });

        // upper boundary folds into the last bucket, not bucket 5
        let high = AffectState::new(1.0, 1.0, 1.0, 0.5).unwrap();
        assert_eq!(high.state_key(), StateKey { v_bucket: 4, a_bucket: 4, s_bucket: 2 });
    }

    #[test]
    fn state_key_display_uses_colon_separated_format() {
        let key = StateKey { v_bucket: 2, a_bucket: 3, s_bucket: 1 };
        assert_eq!(key.to_string(), "2:3:1");
    }

    #[test]
    fn neighboring_states_may_alias() {
        let a = AffectState::new(-0.05, 0.0, 0.1, 0.5).unwrap();
        let b = AffectState::new(0.04, 0.02, 0.12, 0.5).unwrap();
        assert_eq!(a.state_key(), b.state_key());
    }

    proptest::proptest! {
        #[test]
        fn state_key_always_falls_in_the_75_cell_lattice(
            v in -1.0f64..=1.0,
            a in -1.0f64..=1.0,
            s in 0.0f64..=1.0,
        ) {
            let key = AffectState::new(v, a, s, 0.5).unwrap().state_key();
            proptest::prop_assert!(key.v_bucket <= 4);
            proptest::prop_assert!(key.a_bucket <= 4);
            proptest::prop_assert!(key.s_bucket <= 2);
        }

        #[test]
        fn bucket_boundary_always_resolves_to_the_same_cell(
            v_idx in 0u8..5, a_idx in 0u8..5, s_idx in 0u8..3,
        ) {
            // exact lower edge of bucket `idx` on each axis
            let v = (v_idx as f64 / 5.0) * 2.0 - 1.0;
            let a = (a_idx as f64 / 5.0) * 2.0 - 1.0;
            let s = s_idx as f64 / 3.0;
            let key = AffectState::new(v, a, s, 0.5).unwrap().state_key();
            proptest::prop_assert_eq!(key, StateKey { v_bucket: v_idx, a_bucket: a_idx, s_bucket: s_idx });
        }
    }
}
