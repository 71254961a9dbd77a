//! OpenAPI document assembly, served at `/api-docs/openapi.json` with a
//! Swagger UI mounted at `/swagger-ui`.

use utoipa::OpenApi;

use crate::dto::{
    AnalyzeRequest, AnalyzeResponse, DesiredStateDto, DesiredStateRequestDto, FeedbackRequest, FeedbackResponse,
    PartialStateDto, PredictedOutcomeDto, ProgressResponse, RecommendRequest, RecommendResponseDto, RecommendationDto,
    StateDto,
};
use crate::health::{CheckResult, HealthReport};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(routes::analyze, routes::recommend, routes::feedback, routes::progress, routes::healthz),
    components(schemas(
        AnalyzeRequest,
        AnalyzeResponse,
        StateDto,
        DesiredStateDto,
        DesiredStateRequestDto,
        PartialStateDto,
        RecommendRequest,
        RecommendResponseDto,
        RecommendationDto,
        PredictedOutcomeDto,
        FeedbackRequest,
        FeedbackResponse,
        ProgressResponse,
        HealthReport,
        CheckResult,
    )),
    tags((name = "affectus", description = "Affect-aware content recommendation"))
)]
pub struct ApiDoc;
