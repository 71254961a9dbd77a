//! HTTP handlers, one per endpoint in the external interface table.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use affectus_engine::EngineContext;
use affectus_types::{AffectusError, DesiredState};

use crate::dto::{
    affect_state_from_partial, intensity_from_str, AnalyzeRequest, AnalyzeResponse, DesiredStateDto, FeedbackRequest,
    FeedbackResponse, ProgressResponse, RecommendRequest, RecommendResponseDto, StateDto,
};
use crate::envelope::ok_response;
use crate::errors::AppError;
use crate::health;

pub type SharedEngine = Arc<EngineContext>;

#[utoipa::path(post, path = "/emotion/analyze", request_body = AnalyzeRequest, responses((status = 200, body = AnalyzeResponse)))]
pub async fn analyze(State(ctx): State<SharedEngine>, Json(req): Json<AnalyzeRequest>) -> Result<Response, AppError> {
    let reading = ctx
        .oracle
        .analyze(&req.user_id, &req.text)
        .await
        .map_err(|err| AppError::from(AffectusError::DependencyFailure(err.to_string())))?;

    let desired = affectus_engine::derive_desired_state(&reading.state);

    let body = AnalyzeResponse {
        state: StateDto {
            v: reading.state.valence,
            a: reading.state.arousal,
            stress: reading.state.stress,
            primary_emotion: reading.primary_emotion,
            confidence: reading.confidence,
            vector: reading.vector,
            timestamp: chrono::Utc::now(),
        },
        desired: DesiredStateDto::from(&desired),
    };
    Ok(ok_response(body))
}

#[utoipa::path(post, path = "/recommend", request_body = RecommendRequest, responses((status = 200, body = RecommendResponseDto)))]
pub async fn recommend(State(ctx): State<SharedEngine>, Json(req): Json<RecommendRequest>) -> Result<Response, AppError> {
    let current = affect_state_from_partial(&req.current_state, 0.6)
        .ok_or_else(|| AppError::from(AffectusError::StateOutOfRange("current_state".to_string())))?;

    let desired_override = req
        .desired_state
        .map(|d| {
            DesiredState::new(d.target_v, d.target_a, d.target_stress, intensity_from_str(&d.intensity), d.reason)
                .ok_or_else(|| AppError::from(AffectusError::StateOutOfRange("desired_state".to_string())))
        })
        .transpose()?;

    let user_id = req.user_id.clone();
    let limit = req.limit.max(1);
    let timeout = ctx.config.per_user_lock_timeout;

    let response = ctx
        .user_locks
        .with_lock(&user_id, timeout, || async {
            affectus_engine::recommend(&ctx, &user_id, current, desired_override, limit).await
        })
        .await?;

    Ok(ok_response(RecommendResponseDto::from(&response)))
}

#[utoipa::path(post, path = "/feedback", request_body = FeedbackRequest, responses((status = 200, body = FeedbackResponse)))]
pub async fn feedback(State(ctx): State<SharedEngine>, Json(req): Json<FeedbackRequest>) -> Result<Response, AppError> {
    let state_after = affect_state_from_partial(&req.actual_post_state, 0.6)
        .ok_or_else(|| AppError::from(AffectusError::StateOutOfRange("actual_post_state".to_string())))?;

    let user_id = req.user_id.clone();
    let content_id = req.content_id.clone();
    let timeout = ctx.config.per_user_lock_timeout;

    let outcome = ctx
        .user_locks
        .with_lock(&user_id, timeout, || async {
            affectus_engine::feedback(
                &ctx,
                &user_id,
                &content_id,
                state_after,
                req.completed,
                req.watch_duration,
                req.total_duration,
                req.rating,
            )
            .await
        })
        .await?;

    Ok(ok_response(FeedbackResponse {
        reward: outcome.reward,
        policy_updated: true,
        new_q_value: outcome.q_new,
        learning_progress: outcome.exploration_rate,
    }))
}

#[utoipa::path(get, path = "/progress/{user_id}", responses((status = 200, body = ProgressResponse)))]
pub async fn progress(State(ctx): State<SharedEngine>, Path(user_id): Path<String>) -> Result<Response, AppError> {
    let experiences = ctx.experience_log.for_user(&user_id).await;
    let exploration = ctx.exploration.state_for(&user_id).await;
    let report = affectus_engine::analyze(&experiences, exploration.epsilon, ctx.config.epsilon_initial);

    let reward_trend = match report.reward_trend {
        affectus_engine::RewardTrend::Improving => "improving",
        affectus_engine::RewardTrend::Stable => "stable",
        affectus_engine::RewardTrend::Declining => "declining",
    };
    let convergence_stage = match report.convergence_stage {
        affectus_engine::ConvergenceStage::Exploring => "exploring",
        affectus_engine::ConvergenceStage::Learning => "learning",
        affectus_engine::ConvergenceStage::Confident => "confident",
    };

    Ok(ok_response(ProgressResponse {
        total_experiences: report.total_experiences,
        completion_rate: report.completion_rate,
        avg_reward: report.avg_reward,
        reward_trend: reward_trend.to_string(),
        exploration_count: report.exploration_count,
        exploitation_count: report.exploitation_count,
        convergence_score: report.convergence_score,
        convergence_stage: convergence_stage.to_string(),
    }))
}

#[utoipa::path(get, path = "/healthz", responses((status = 200, body = health::HealthReport)))]
pub async fn healthz(State(ctx): State<SharedEngine>) -> Response {
    let report = health::check_all(&ctx).await;
    let status = if report.is_healthy() { axum::http::StatusCode::OK } else { axum::http::StatusCode::SERVICE_UNAVAILABLE };
    (status, Json(report)).into_response()
}
