//! Deterministic derivation of a `ContentProfile` from catalog metadata,
//! plus the in-memory profile map and the vector index upsert side effect
//!.

use std::collections::HashMap;
use std::sync::Arc;

use affectus_types::{AffectusError, ContentMetadata, ContentProfile, PrimaryTone, Result, TargetAnchor};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;

use crate::embedder::embed_profile;
use crate::vector_index::VectorIndex;
use crate::vocab::{CATEGORY_TONE_OVERRIDES, GENRE_AFFECT_TABLE, GENRE_TONE_TABLE, NEUTRAL_AFFECT};

/// Derives content profiles from catalog metadata and keeps an in-memory
/// map plus the shared vector index in sync.
pub struct ContentProfiler {
    vector_index: Arc<VectorIndex>,
    profiles: RwLock<HashMap<String, ContentProfile>>,
}

impl ContentProfiler {
    pub fn new(vector_index: Arc<VectorIndex>) -> Self {
        Self {
            vector_index,
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Derive a profile, upsert its embedding into the vector index, and
    /// store the profile. Rejects metadata with non-finite numeric fields
    ///.
    pub async fn profile(&self, metadata: &ContentMetadata) -> Result<ContentProfile> {
        if !metadata.duration_minutes.is_finite() {
            return Err(AffectusError::InvalidInput(format!(
                "duration_minutes is not finite for content {}",
                metadata.content_id
            )));
        }

        let profile = derive_profile(metadata);
        let embedding = embed_profile(&profile);

        self.vector_index
            .upsert(
                profile.content_id.clone(),
                embedding,
                json!({ "title": metadata.title, "category": profile.category }),
            )
            .await;

        self.profiles
            .write()
            .await
            .insert(profile.content_id.clone(), profile.clone());

        debug!(content_id = %profile.content_id, tone = ?profile.primary_tone, "profiled content");
        Ok(profile)
    }

    pub async fn get(&self, content_id: &str) -> Option<ContentProfile> {
        self.profiles.read().await.get(content_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }
}

fn derive_profile(metadata: &ContentMetadata) -> ContentProfile {
    let lower_genres: Vec<String> = metadata.genres.iter().map(|g| g.to_lowercase()).collect();

    let (valence_delta, arousal_delta, intensity) = average_affect(&lower_genres);
    let complexity = derive_complexity(lower_genres.len());
    let primary_tone = derive_tone(&metadata.category.to_lowercase(), &lower_genres, &metadata.content_id);
    let target_states = vec![
        TargetAnchor {
            valence: valence_delta * 0.5,
            arousal: arousal_delta * 0.5,
        },
        TargetAnchor {
            valence: valence_delta * 0.3,
            arousal: arousal_delta * 0.3,
        },
    ];

    ContentProfile {
        content_id: metadata.content_id.clone(),
        primary_tone,
        valence_delta,
        arousal_delta,
        intensity,
        complexity,
        target_states,
        duration_minutes: metadata.duration_minutes,
        category: metadata.category.clone(),
        genres: metadata.genres.clone(),
    }
}

fn average_affect(lower_genres: &[String]) -> (f64, f64, f64) {
    let matches: Vec<(f64, f64, f64)> = lower_genres
        .iter()
        .filter_map(|g| {
            GENRE_AFFECT_TABLE
                .iter()
                .find(|(name, ..)| name == g)
                .map(|(_, v, a, i)| (*v, *a, *i))
        })
        .collect();

    if matches.is_empty() {
        return NEUTRAL_AFFECT;
    }

    let n = matches.len() as f64;
    let (sv, sa, si) = matches
        .iter()
        .fold((0.0, 0.0, 0.0), |(av, aa, ai), (v, a, i)| (av + v, aa + a, ai + i));
    (sv / n, sa / n, si / n)
}

fn derive_complexity(genre_count: usize) -> f64 {
    if genre_count == 0 {
        return 0.3;
    }
    (0.3 + 0.15 * genre_count as f64).min(0.9)
}

fn derive_tone(category: &str, lower_genres: &[String], content_id: &str) -> PrimaryTone {
    if let Some((_, tone)) = CATEGORY_TONE_OVERRIDES.iter().find(|(c, _)| *c == category) {
        return *tone;
    }

    for genre in lower_genres {
        if let Some((_, tone)) = GENRE_TONE_TABLE.iter().find(|(g, _)| g == genre) {
            return *tone;
        }
    }

    fallback_tone(content_id)
}

/// Deterministic fallback: first-character parity of `content_id` indexes
/// into the fixed 4-tone cycle.
fn fallback_tone(content_id: &str) -> PrimaryTone {
    let first = content_id.chars().next().unwrap_or('a');
    let parity = (first as u32) % PrimaryTone::FALLBACK_CYCLE.len() as u32;
    PrimaryTone::FALLBACK_CYCLE[parity as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(id: &str, genres: &[&str], category: &str) -> ContentMetadata {
        ContentMetadata {
            content_id: id.into(),
            title: "t".into(),
            genres: genres.iter().map(|s| s.to_string()).collect(),
            category: category.into(),
            duration_minutes: 30.0,
        }
    }

    #[tokio::test]
    async fn action_comedy_matches_scenario_s3() {
        let profiler = ContentProfiler::new(Arc::new(VectorIndex::new()));
        let profile = profiler
            .profile(&metadata("c1", &["action", "comedy"], "film"))
            .await
            .unwrap();

        assert!((profile.valence_delta - 0.4).abs() < 1e-9);
        assert!((profile.arousal_delta - 0.4).abs() < 1e-9);
        assert!((profile.intensity - 0.7).abs() < 1e-9);
        assert!((profile.complexity - 0.60).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unmatched_genres_use_neutral_default() {
        let profiler = ContentProfiler::new(Arc::new(VectorIndex::new()));
        let profile = profiler
            .profile(&metadata("c2", &["unknowngenre"], "film"))
            .await
            .unwrap();
        assert_eq!((profile.valence_delta, profile.arousal_delta, profile.intensity), NEUTRAL_AFFECT);
    }

    #[tokio::test]
    async fn no_genres_gives_baseline_complexity() {
        let profiler = ContentProfiler::new(Arc::new(VectorIndex::new()));
        let profile = profiler.profile(&metadata("c3", &[], "film")).await.unwrap();
        assert_eq!(profile.complexity, 0.3);
    }

    #[tokio::test]
    async fn category_override_wins_over_genre_table() {
        let profiler = ContentProfiler::new(Arc::new(VectorIndex::new()));
        let profile = profiler
            .profile(&metadata("c4", &["action"], "meditation"))
            .await
            .unwrap();
        assert_eq!(profile.primary_tone, PrimaryTone::Calming);
    }

    #[tokio::test]
    async fn rejects_non_finite_duration() {
        let profiler = ContentProfiler::new(Arc::new(VectorIndex::new()));
        let mut m = metadata("c5", &[], "film");
        m.duration_minutes = f64::NAN;
        assert!(profiler.profile(&m).await.is_err());
    }

    #[tokio::test]
    async fn same_metadata_gives_same_profile() {
        let profiler = ContentProfiler::new(Arc::new(VectorIndex::new()));
        let m = metadata("c6", &["drama", "romance"], "film");
        let p1 = profiler.profile(&m).await.unwrap();
        let p2 = profiler.profile(&m).await.unwrap();
        assert_eq!(p1, p2);
    }

    #[test]
    fn fallback_tone_is_deterministic() {
        assert_eq!(fallback_tone("apple"), fallback_tone("apple"));
    }
}
