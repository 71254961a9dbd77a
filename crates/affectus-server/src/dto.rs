//! Request/response DTOs for the HTTP boundary, kept separate from the core
//! value types so only this crate pulls in `utoipa`.

use affectus_engine::{Recommendation, RecommendResponse};
use affectus_policy::PredictedOutcome;
use affectus_types::{AffectState, DesiredState, Intensity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StateDto {
    pub v: f64,
    pub a: f64,
    pub stress: f64,
    pub primary_emotion: String,
    pub confidence: f64,
    pub vector: [f64; 8],
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DesiredStateDto {
    pub target_v: f64,
    pub target_a: f64,
    pub target_stress: f64,
    pub intensity: String,
    pub reasoning: String,
}

impl From<&DesiredState> for DesiredStateDto {
    fn from(d: &DesiredState) -> Self {
        Self {
            target_v: d.target_valence,
            target_a: d.target_arousal,
            target_stress: d.target_stress,
            intensity: intensity_str(d.intensity).to_string(),
            reasoning: d.reason.clone(),
        }
    }
}

fn intensity_str(intensity: Intensity) -> &'static str {
    match intensity {
        Intensity::Subtle => "subtle",
        Intensity::Moderate => "moderate",
        Intensity::Significant => "significant",
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub state: StateDto,
    pub desired: DesiredStateDto,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PartialStateDto {
    pub v: f64,
    pub a: f64,
    #[serde(default)]
    pub stress: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DesiredStateRequestDto {
    pub target_v: f64,
    pub target_a: f64,
    #[serde(default)]
    pub target_stress: f64,
    #[serde(default = "default_intensity")]
    pub intensity: String,
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_intensity() -> String {
    "moderate".to_string()
}

fn default_reason() -> String {
    "client_supplied".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendRequest {
    pub user_id: String,
    pub current_state: PartialStateDto,
    pub desired_state: Option<DesiredStateRequestDto>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictedOutcomeDto {
    pub valence: f64,
    pub arousal: f64,
    pub stress: f64,
    pub confidence: f64,
}

impl From<&PredictedOutcome> for PredictedOutcomeDto {
    fn from(o: &PredictedOutcome) -> Self {
        Self { valence: o.valence, arousal: o.arousal, stress: o.stress, confidence: o.confidence }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationDto {
    pub content_id: String,
    pub title: String,
    pub q_value: f64,
    pub similarity: f64,
    pub combined_score: f64,
    pub predicted_outcome: PredictedOutcomeDto,
    pub reasoning: String,
    pub is_exploration: bool,
}

impl From<&Recommendation> for RecommendationDto {
    fn from(r: &Recommendation) -> Self {
        Self {
            content_id: r.content_id.clone(),
            title: r.title.clone(),
            q_value: r.q_value,
            similarity: r.similarity,
            combined_score: r.combined_score,
            predicted_outcome: PredictedOutcomeDto::from(&r.predicted_outcome),
            reasoning: r.reasoning.clone(),
            is_exploration: r.is_exploration,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendResponseDto {
    pub recommendations: Vec<RecommendationDto>,
    pub exploration_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&RecommendResponse> for RecommendResponseDto {
    fn from(r: &RecommendResponse) -> Self {
        Self {
            recommendations: r.recommendations.iter().map(RecommendationDto::from).collect(),
            exploration_rate: r.exploration_rate,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub user_id: String,
    pub content_id: String,
    pub actual_post_state: PartialStateDto,
    pub watch_duration: f64,
    pub total_duration: f64,
    pub completed: bool,
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub reward: f64,
    pub policy_updated: bool,
    pub new_q_value: f64,
    pub learning_progress: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    pub total_experiences: usize,
    pub completion_rate: f64,
    pub avg_reward: f64,
    pub reward_trend: String,
    pub exploration_count: usize,
    pub exploitation_count: usize,
    pub convergence_score: f64,
    pub convergence_stage: String,
}

pub fn affect_state_from_partial(partial: &PartialStateDto, confidence: f64) -> Option<AffectState> {
    AffectState::new(partial.v, partial.a, partial.stress, confidence)
}

pub fn intensity_from_str(value: &str) -> Intensity {
    match value {
        "subtle" => Intensity::Subtle,
        "significant" => Intensity::Significant,
        _ => Intensity::Moderate,
    }
}
