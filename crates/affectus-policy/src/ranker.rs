//! Combines a Q-value, vector similarity, and goal alignment into one
//! ranking score over retrieved candidates.

use affectus_types::{AffectState, ContentProfile};

use crate::qstore::QStore;
use crate::reward::cosine;

const DEFAULT_Q: f64 = 0.5;
const ALIGNMENT_BOOST_THRESHOLD: f64 = 0.8;
const ALIGNMENT_BOOST_CAP: f64 = 1.10;

pub struct RankedItem {
    pub content_id: String,
    pub profile: ContentProfile,
    pub similarity: f64,
    pub q_value: f64,
    pub alignment: f64,
    pub combined_score: f64,
}

pub struct HybridRanker;

impl HybridRanker {
    /// Score and sort `candidates` (content_id, profile, similarity)
    /// descending by combined score, ties broken by content_id ascending.
    pub async fn rank(
        qstore: &QStore,
        user_id: &str,
        state_key: affectus_types::StateKey,
        current: &AffectState,
        desired: &AffectState,
        candidates: Vec<(String, ContentProfile, f64)>,
    ) -> Vec<RankedItem> {
        let mut ranked = Vec::with_capacity(candidates.len());
        for (content_id, profile, similarity) in candidates {
            let q_value = qstore
                .get(user_id, state_key, &content_id)
                .await
                .map(|e| e.q_value)
                .unwrap_or(DEFAULT_Q);
            let q_n = (q_value + 1.0) / 2.0;

            let alignment = alignment_score(&profile, current, desired);
            let combined_score = (0.7 * q_n + 0.3 * similarity) * alignment;

            ranked.push(RankedItem {
                content_id,
                profile,
                similarity,
                q_value,
                alignment,
                combined_score,
            });
        }
        ranked.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.content_id.cmp(&b.content_id))
        });
        ranked
    }
}

fn alignment_score(profile: &ContentProfile, current: &AffectState, desired: &AffectState) -> f64 {
    let content_vec = (profile.valence_delta, profile.arousal_delta);
    let goal_vec = (desired.valence - current.valence, desired.arousal - current.arousal);

    let content_mag = (content_vec.0 * content_vec.0 + content_vec.1 * content_vec.1).sqrt();
    let goal_mag = (goal_vec.0 * goal_vec.0 + goal_vec.1 * goal_vec.1).sqrt();
    if content_mag == 0.0 || goal_mag == 0.0 {
        return 0.5;
    }

    let raw = cosine(content_vec, goal_vec);
    let mapped = (raw + 1.0) / 2.0;
    if mapped > ALIGNMENT_BOOST_THRESHOLD {
        (mapped + 0.5 * (mapped - ALIGNMENT_BOOST_THRESHOLD)).min(ALIGNMENT_BOOST_CAP)
    } else {
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use affectus_types::{PrimaryTone, StateKey};

    fn profile(id: &str, valence_delta: f64, arousal_delta: f64) -> ContentProfile {
        ContentProfile {
            content_id: id.into(),
            primary_tone: PrimaryTone::Neutral,
            valence_delta,
            arousal_delta,
            intensity: 0.5,
            complexity: 0.5,
            target_states: vec![],
            duration_minutes: 20.0,
            category: "video".into(),
            genres: vec![],
        }
    }

    fn key() -> StateKey {
        StateKey { v_bucket: 2, a_bucket: 2, s_bucket: 1 }
    }

    #[tokio::test]
    async fn missing_q_entries_default_to_half() {
        let qstore = QStore::new();
        let current = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let desired = AffectState::new(0.5, 0.0, 0.5, 0.5).unwrap();
        let candidates = vec![("c1".to_string(), profile("c1", 0.5, 0.0), 0.8)];
        let ranked = HybridRanker::rank(&qstore, "u1", key(), &current, &desired, candidates).await;
        assert_eq!(ranked[0].q_value, 0.5);
    }

    #[tokio::test]
    async fn ties_broken_by_content_id() {
        let qstore = QStore::new();
        let current = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let desired = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let candidates = vec![
            ("z".to_string(), profile("z", 0.0, 0.0), 0.0),
            ("a".to_string(), profile("a", 0.0, 0.0), 0.0),
        ];
        let ranked = HybridRanker::rank(&qstore, "u1", key(), &current, &desired, candidates).await;
        assert_eq!(ranked[0].content_id, "a");
    }

    #[tokio::test]
    async fn higher_q_ranks_above_lower_q_all_else_equal() {
        let qstore = QStore::new();
        qstore.put("u1", key(), "hi", 0.9).await;
        qstore.put("u1", key(), "lo", -0.9).await;
        let current = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let desired = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let candidates = vec![
            ("hi".to_string(), profile("hi", 0.0, 0.0), 0.5),
            ("lo".to_string(), profile("lo", 0.0, 0.0), 0.5),
        ];
        let ranked = HybridRanker::rank(&qstore, "u1", key(), &current, &desired, candidates).await;
        assert_eq!(ranked[0].content_id, "hi");
    }

    #[tokio::test]
    async fn swapping_candidate_ids_swaps_tie_order() {
        let qstore = QStore::new();
        let current = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let desired = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let candidates = vec![
            ("content_b".to_string(), profile("content_b", 0.2, 0.1), 0.6),
            ("content_a".to_string(), profile("content_a", 0.2, 0.1), 0.6),
        ];
        let ranked = HybridRanker::rank(&qstore, "u1", key(), &current, &desired, candidates).await;
        assert_eq!(ranked[0].content_id, "content_a");
        assert_eq!(ranked[0].combined_score, ranked[1].combined_score);

        let swapped = vec![
            ("content_a".to_string(), profile("content_a", 0.2, 0.1), 0.6),
            ("content_b".to_string(), profile("content_b", 0.2, 0.1), 0.6),
        ];
        let swapped_ranked = HybridRanker::rank(&qstore, "u1", key(), &current, &desired, swapped).await;
        assert_eq!(swapped_ranked[0].content_id, "content_a");
    }

    #[test]
    fn zero_magnitude_alignment_is_half() {
        let current = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let desired = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let p = profile("c1", 0.0, 0.0);
        assert_eq!(alignment_score(&p, &current, &desired), 0.5);
    }

    #[test]
    fn strong_alignment_gets_boosted_and_capped() {
        let current = AffectState::new(0.0, 0.0, 0.5, 0.5).unwrap();
        let desired = AffectState::new(1.0, 0.0, 0.5, 0.5).unwrap();
        let p = profile("c1", 1.0, 0.0);
        let score = alignment_score(&p, &current, &desired);
        assert!(score > 1.0 && score <= ALIGNMENT_BOOST_CAP);
    }
}
