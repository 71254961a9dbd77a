//! `recommend(user, current_state, desired_state?, limit)`: desired-state
//! inference, retrieval, ranking, exploration injection, outcome
//! prediction and rationale generation.

use affectus_embed::embed_goal;
use affectus_policy::{predict, HybridRanker, PredictedOutcome, RankedCandidate};
use affectus_types::{AffectState, DesiredState, Intensity, Result, SessionEntry};
use chrono::Utc;

use crate::context::EngineContext;
use crate::rationale;

pub struct Recommendation {
    pub content_id: String,
    pub title: String,
    pub q_value: f64,
    pub similarity: f64,
    pub combined_score: f64,
    pub predicted_outcome: PredictedOutcome,
    pub reasoning: String,
    pub is_exploration: bool,
}

pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
    pub exploration_rate: f64,
}

/// Priority-ordered rule table mapping current state to a desired target.
/// Anxiety-reduction is checked ahead of the stress-driven calming rule so
/// that a state matching both (high stress *and* anxious arousal) resolves
/// to the more specific anxiety-reducing target.
pub fn derive_desired_state(current: &AffectState) -> DesiredState {
    if current.valence < 0.0 && current.arousal > 0.40 {
        let target_arousal = (current.arousal - 0.60).max(-1.0);
        let target_valence = (current.valence + 0.30).min(1.0);
        let target_stress = (current.stress * 0.5).max(0.0);
        return DesiredState::new(target_valence, target_arousal, target_stress, Intensity::Moderate, "anxiety_reducing")
            .expect("bounded inputs");
    }

    if current.stress > 0.60 {
        let target_stress = (current.stress * 0.4).max(0.0);
        return DesiredState::new(0.30, -0.30, target_stress, Intensity::Significant, "calming").expect("bounded inputs");
    }

    if current.valence < -0.40 {
        let target_valence = (current.valence + 0.40).max(0.20).min(1.0);
        let target_arousal = (current.arousal + 0.10).min(1.0);
        return DesiredState::new(target_valence, target_arousal, current.stress, Intensity::Moderate, "mood_lifting")
            .expect("bounded inputs");
    }

    if current.valence.abs() < 0.20 && current.arousal < -0.30 {
        let target_arousal = (current.arousal + 0.40).min(1.0);
        let target_valence = (current.valence + 0.10).min(1.0);
        return DesiredState::new(target_valence, target_arousal, current.stress, Intensity::Moderate, "stimulating")
            .expect("bounded inputs");
    }

    let target_valence = (current.valence + 0.05).min(1.0);
    DesiredState::new(target_valence, current.arousal, current.stress, Intensity::Subtle, "maintain").expect("bounded inputs")
}

pub async fn recommend(
    ctx: &EngineContext,
    user_id: &str,
    current: AffectState,
    desired_override: Option<DesiredState>,
    limit: usize,
) -> Result<RecommendResponse> {
    let desired_full = desired_override.unwrap_or_else(|| derive_desired_state(&current));
    let desired_affect = AffectState::new(
        desired_full.target_valence,
        desired_full.target_arousal,
        desired_full.target_stress,
        current.confidence,
    )
    .expect("DesiredState already validated its own axes");

    let goal_vector = embed_goal(&current, &desired_full);
    let hits = ctx.vector_index.search(&goal_vector, 3 * limit.max(1)).await;

    if hits.is_empty() {
        return Ok(RecommendResponse { recommendations: vec![], exploration_rate: ctx.exploration.state_for(user_id).await.epsilon });
    }

    let state_key = current.state_key();
    let mut candidates = Vec::with_capacity(hits.len());
    for hit in &hits {
        if let Some(profile) = ctx.profiler.get(&hit.content_id).await {
            candidates.push((hit.content_id.clone(), profile, hit.score));
        }
    }

    let ranked = HybridRanker::rank(&ctx.qstore, user_id, state_key, &current, &desired_affect, candidates).await;

    let titles = titles_for(ctx, &hits).await;

    let injectable: Vec<RankedCandidate<_>> = ranked
        .into_iter()
        .map(|item| RankedCandidate { combined_score: item.combined_score, is_exploration: false, payload: item })
        .collect();
    let injected = ctx.exploration.inject(user_id, injectable).await;

    let now = Utc::now();
    let mut recommendations = Vec::with_capacity(limit);
    for candidate in injected.into_iter().take(limit) {
        let item = candidate.payload;
        let outcome = predict(&current, &item.profile);
        let reasoning = rationale::generate(&item, &outcome, &current);
        let title = titles.get(&item.content_id).cloned().unwrap_or_default();

        ctx.sessions
            .put(
                user_id,
                &item.content_id,
                SessionEntry {
                    state_before: current,
                    desired_state: desired_full.clone(),
                    issued_at: now,
                    was_exploration: candidate.is_exploration,
                },
            )
            .await;

        recommendations.push(Recommendation {
            content_id: item.content_id,
            title,
            q_value: item.q_value,
            similarity: item.similarity,
            combined_score: candidate.combined_score,
            predicted_outcome: outcome,
            reasoning,
            is_exploration: candidate.is_exploration,
        });
    }

    let exploration_rate = ctx.exploration.state_for(user_id).await.epsilon;
    Ok(RecommendResponse { recommendations, exploration_rate })
}

async fn titles_for(ctx: &EngineContext, hits: &[affectus_embed::VectorHit]) -> std::collections::HashMap<String, String> {
    let mut out = std::collections::HashMap::new();
    for hit in hits {
        if let Some(title) = hit.meta.get("title").and_then(|v| v.as_str()) {
            out.insert(hit.content_id.clone(), title.to_string());
        }
    }
    out
}
