//! `feedback(user, content_id, state_after, completed, watch_duration,
//! total_duration, rating?)`: reward computation, experience logging,
//! Q-learning update, and exploration decay.

use affectus_types::{AffectState, AffectusError, Experience, Result};
use chrono::Utc;

use crate::context::EngineContext;

pub struct FeedbackOutcome {
    pub reward: f64,
    pub q_old: f64,
    pub q_new: f64,
    pub exploration_rate: f64,
}

#[allow(clippy::too_many_arguments)]
pub async fn feedback(
    ctx: &EngineContext,
    user_id: &str,
    content_id: &str,
    state_after: AffectState,
    completed: bool,
    watch_duration: f64,
    total_duration: f64,
    rating: Option<f64>,
) -> Result<FeedbackOutcome> {
    let session = ctx
        .sessions
        .get(user_id, content_id)
        .await
        .ok_or_else(|| AffectusError::NoPendingSession { user_id: user_id.to_string(), content_id: content_id.to_string() })?;

    let breakdown = ctx.reward_calculator.compute(
        &session.state_before,
        &state_after,
        &AffectState::new(
            session.desired_state.target_valence,
            session.desired_state.target_arousal,
            session.desired_state.target_stress,
            session.state_before.confidence,
        )
        .expect("desired state axes already validated"),
        completed,
        watch_duration,
        total_duration,
    );
    let reward = breakdown.total;

    let key_before = session.state_before.state_key();
    let key_after = state_after.state_key();

    let q_old = ctx.qstore.get(user_id, key_before, content_id).await.map(|e| e.q_value).unwrap_or(0.0);
    let max_next = ctx.qstore.max_at(user_id, key_after).await;
    let q_new = q_old + ctx.config.q_learning_rate * (reward + ctx.config.q_discount * max_next - q_old);

    ctx.experience_log
        .append(Experience {
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            state_before: session.state_before,
            content_id: content_id.to_string(),
            state_after,
            desired_state: session.desired_state,
            reward,
            completed,
            watch_duration,
            total_duration,
            rating,
            was_exploration: session.was_exploration,
        })
        .await;

    ctx.qstore.put(user_id, key_before, content_id, q_new).await;
    let exploration = ctx.exploration.record_feedback(user_id, reward).await;
    ctx.sessions.remove(user_id, content_id).await;

    Ok(FeedbackOutcome { reward, q_old, q_new, exploration_rate: exploration.epsilon })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EngineContext;
    use affectus_config::AffectusConfig;
    use affectus_oracle::MockAffectOracle;
    use affectus_types::{ContentMetadata, DesiredState, Intensity};
    use std::sync::Arc;

    async fn setup() -> EngineContext {
        let ctx = EngineContext::new(AffectusConfig::default(), Arc::new(MockAffectOracle));
        ctx.profiler
            .profile(&ContentMetadata {
                content_id: "c1".into(),
                title: "Calm Waters".into(),
                genres: vec!["meditation".into()],
                category: "video".into(),
                duration_minutes: 30.0,
            })
            .await
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn rejects_feedback_with_no_pending_session() {
        let ctx = setup().await;
        let state_after = AffectState::new(0.3, -0.1, 0.4, 0.5).unwrap();
        let result = feedback(&ctx, "u1", "c1", state_after, true, 30.0, 30.0, None).await;
        assert!(matches!(result, Err(AffectusError::NoPendingSession { .. })));
    }

    #[tokio::test]
    async fn scenario_s1_strong_alignment_yields_high_reward_and_q_increase() {
        let ctx = setup().await;
        let state_before = AffectState::new(-0.60, 0.20, 0.70, 0.5).unwrap();
        let desired = DesiredState::new(0.50, -0.20, 0.30, Intensity::Significant, "calming").unwrap();
        ctx.sessions
            .put(
                "u1",
                "c1",
                affectus_types::SessionEntry { state_before, desired_state: desired, issued_at: Utc::now(), was_exploration: false },
            )
            .await;

        let state_after = AffectState::new(0.30, -0.10, 0.40, 0.5).unwrap();
        let outcome = feedback(&ctx, "u1", "c1", state_after, true, 30.0, 30.0, None).await.unwrap();

        assert!(outcome.reward >= 0.55 && outcome.reward <= 0.85, "reward was {}", outcome.reward);
        assert!(outcome.q_new > outcome.q_old);
    }

    #[tokio::test]
    async fn scenario_s2_wrong_direction_and_early_abandon_yields_negative_reward() {
        let ctx = setup().await;
        let state_before = AffectState::new(0.0, 0.0, 0.3, 0.5).unwrap();
        let desired = DesiredState::new(0.50, -0.20, 0.20, Intensity::Moderate, "calming").unwrap();
        ctx.sessions
            .put(
                "u1",
                "c1",
                affectus_types::SessionEntry { state_before, desired_state: desired, issued_at: Utc::now(), was_exploration: false },
            )
            .await;

        let state_after = AffectState::new(-0.50, 0.60, 0.5, 0.5).unwrap();
        let outcome = feedback(&ctx, "u1", "c1", state_after, false, 5.0, 30.0, None).await.unwrap();

        assert!(outcome.reward < 0.0, "reward was {}", outcome.reward);
        assert!(outcome.q_new < outcome.q_old);
    }

    #[tokio::test]
    async fn feedback_for_one_user_never_touches_another_users_q_value() {
        let ctx = setup().await;
        let state_before = AffectState::new(0.0, 0.0, 0.3, 0.5).unwrap();
        let desired = DesiredState::new(0.3, 0.0, 0.2, Intensity::Subtle, "maintain").unwrap();
        ctx.sessions
            .put(
                "u1",
                "c1",
                affectus_types::SessionEntry { state_before, desired_state: desired, issued_at: Utc::now(), was_exploration: false },
            )
            .await;

        let state_after = AffectState::new(0.2, 0.0, 0.2, 0.5).unwrap();
        feedback(&ctx, "u1", "c1", state_after, true, 30.0, 30.0, None).await.unwrap();

        let key = state_before.state_key();
        assert!(ctx.qstore.get("u2", key, "c1").await.is_none());
    }
}
