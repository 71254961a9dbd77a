//! 1536-D unit-norm affect embedding.
//!
//! Hand-crafted, not learned: two implementations agree bit-for-bit given
//! the same vocabularies and the same segment ordering. See `vocab.rs` for
//! the published, versioned vocabularies.

use crate::vocab::{self, TONE_VOCAB};
use affectus_types::{AffectState, ContentProfile, DesiredState};

pub const EMBEDDING_DIM: usize = 1536;

const TONE_SEGMENT: (usize, usize) = (0, 256);
const VALENCE_DELTA_SEGMENT: (usize, usize) = (256, 384);
const AROUSAL_DELTA_SEGMENT: (usize, usize) = (384, 512);
const INTENSITY_SEGMENT: (usize, usize) = (512, 640);
const COMPLEXITY_SEGMENT: (usize, usize) = (640, 768);
const ANCHORS_SEGMENT: (usize, usize) = (768, 1024);
const GENRE_SEGMENT: (usize, usize) = (1024, 1152);
const CATEGORY_SEGMENT: (usize, usize) = (1152, 1280);
// 1280..1536 reserved, stays zero.

const TONE_STRIDE: usize = 32;
const MAX_ANCHORS: usize = 3;

/// Gaussian bump over a segment of length `len`, centered at `center*len`:
/// `w_i = exp(-(i - c*S)^2 / (2*(S/6)^2))`, written into
/// `out[offset..offset+len]`.
fn gaussian_bump(out: &mut [f64], offset: usize, len: usize, center01: f64) {
    let s = len as f64;
    let c = center01.clamp(0.0, 1.0) * s;
    let sigma = s / 6.0;
    let denom = 2.0 * sigma * sigma;
    for i in 0..len {
        let d = i as f64 - c;
        out[offset + i] = (-(d * d) / denom).exp();
    }
}

fn l2_normalize(v: &mut [f64]) {
    let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Embed a content profile's expected emotional effect into a unit-norm
/// 1536-D vector.
pub fn embed_profile(profile: &ContentProfile) -> Vec<f64> {
    let mut v = vec![0.0f64; EMBEDDING_DIM];

    let tone_idx = vocab::tone_index(profile.primary_tone);
    v[TONE_SEGMENT.0 + tone_idx * TONE_STRIDE] = 1.0;

    gaussian_bump(
        &mut v,
        VALENCE_DELTA_SEGMENT.0,
        VALENCE_DELTA_SEGMENT.1 - VALENCE_DELTA_SEGMENT.0,
        (profile.valence_delta + 1.0) / 2.0,
    );
    gaussian_bump(
        &mut v,
        AROUSAL_DELTA_SEGMENT.0,
        AROUSAL_DELTA_SEGMENT.1 - AROUSAL_DELTA_SEGMENT.0,
        (profile.arousal_delta + 1.0) / 2.0,
    );
    gaussian_bump(
        &mut v,
        INTENSITY_SEGMENT.0,
        INTENSITY_SEGMENT.1 - INTENSITY_SEGMENT.0,
        profile.intensity,
    );
    gaussian_bump(
        &mut v,
        COMPLEXITY_SEGMENT.0,
        COMPLEXITY_SEGMENT.1 - COMPLEXITY_SEGMENT.0,
        profile.complexity,
    );

    write_anchors(&mut v, &profile.target_states.iter().map(|a| (a.valence, a.arousal)).collect::<Vec<_>>());

    for genre in &profile.genres {
        if let Some(slot) = vocab::genre_slot(&genre.to_lowercase()) {
            v[GENRE_SEGMENT.0 + slot] = 1.0;
        }
    }
    if let Some(slot) = vocab::category_slot(&profile.category.to_lowercase()) {
        v[CATEGORY_SEGMENT.0 + slot] = 1.0;
    }

    l2_normalize(&mut v);
    v
}

/// Embed a transition goal (current -> desired) into the same 1536-D
/// space, reusing the delta segments with the delta set to
/// `desired - current`.
pub fn embed_goal(current: &AffectState, desired: &DesiredState) -> Vec<f64> {
    let mut v = vec![0.0f64; EMBEDDING_DIM];

    let valence_delta = desired.target_valence - current.valence;
    let arousal_delta = desired.target_arousal - current.arousal;

    gaussian_bump(
        &mut v,
        VALENCE_DELTA_SEGMENT.0,
        VALENCE_DELTA_SEGMENT.1 - VALENCE_DELTA_SEGMENT.0,
        (valence_delta.clamp(-1.0, 1.0) + 1.0) / 2.0,
    );
    gaussian_bump(
        &mut v,
        AROUSAL_DELTA_SEGMENT.0,
        AROUSAL_DELTA_SEGMENT.1 - AROUSAL_DELTA_SEGMENT.0,
        (arousal_delta.clamp(-1.0, 1.0) + 1.0) / 2.0,
    );

    write_anchors(&mut v, &[(desired.target_valence, desired.target_arousal)]);

    l2_normalize(&mut v);
    v
}

/// Writes up to `MAX_ANCHORS` (valence, arousal) anchors into the shared
/// anchors segment, 86 dims max per anchor, split evenly between a
/// valence-half and an arousal-half.
fn write_anchors(out: &mut [f64], anchors: &[(f64, f64)]) {
    let seg_len = ANCHORS_SEGMENT.1 - ANCHORS_SEGMENT.0;
    let per_anchor = seg_len / MAX_ANCHORS; // 85, with the remainder folded into the last anchor
    for (i, (val, aro)) in anchors.iter().take(MAX_ANCHORS).enumerate() {
        let start = ANCHORS_SEGMENT.0 + i * per_anchor;
        let len = if i == MAX_ANCHORS - 1 {
            seg_len - per_anchor * (MAX_ANCHORS - 1)
        } else {
            per_anchor
        };
        let half = len / 2;
        gaussian_bump(out, start, half, (val.clamp(-1.0, 1.0) + 1.0) / 2.0);
        gaussian_bump(out, start + half, len - half, (aro.clamp(-1.0, 1.0) + 1.0) / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use affectus_types::{ContentProfile, PrimaryTone, TargetAnchor};

    fn sample_profile() -> ContentProfile {
        ContentProfile {
            content_id: "c1".into(),
            primary_tone: PrimaryTone::Calming,
            valence_delta: 0.4,
            arousal_delta: -0.3,
            intensity: 0.6,
            complexity: 0.5,
            target_states: vec![
                TargetAnchor { valence: 0.2, arousal: -0.15 },
                TargetAnchor { valence: 0.12, arousal: -0.09 },
            ],
            duration_minutes: 20.0,
            category: "meditation".into(),
            genres: vec!["meditation".into()],
        }
    }

    #[test]
    fn embedding_is_unit_norm() {
        let v = embed_profile(&sample_profile());
        assert_eq!(v.len(), EMBEDDING_DIM);
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }

    #[test]
    fn goal_embedding_is_unit_norm() {
        let current = AffectState::new(-0.2, 0.3, 0.5, 0.5).unwrap();
        let desired = DesiredState::new(0.4, -0.2, 0.2, affectus_types::Intensity::Moderate, "calm down").unwrap();
        let v = embed_goal(&current, &desired);
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }

    #[test]
    fn reserved_tail_stays_zero() {
        let v = embed_profile(&sample_profile());
        assert!(v[1280..1536].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn deterministic_for_same_profile() {
        let a = embed_profile(&sample_profile());
        let b = embed_profile(&sample_profile());
        assert_eq!(a, b);
    }

    #[test]
    fn tone_onehot_block_is_isolated() {
        let v = embed_profile(&sample_profile());
        let idx = vocab::tone_index(PrimaryTone::Calming);
        // Only that tone's block start is 1 before normalization scales it down uniformly;
        // verify no other tone's dedicated slot is hot.
        for (i, tone) in TONE_VOCAB.iter().enumerate() {
            if *tone != PrimaryTone::Calming {
                assert_eq!(v[i * TONE_STRIDE], 0.0);
            }
        }
        assert!(v[idx * TONE_STRIDE] > 0.0);
    }
}
