//! Maps core `AffectusError`s onto HTTP status codes and the stable
//! `E00x` codes the envelope surfaces.

use affectus_types::AffectusError;
use axum::http::StatusCode;

/// HTTP-boundary wrapper around a core error, carrying the status code
/// alongside it so `envelope::error_response` doesn't have to re-derive it.
#[derive(Debug)]
pub struct AppError(pub AffectusError);

impl From<AffectusError> for AppError {
    fn from(err: AffectusError) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AffectusError::InvalidInput(_)
            | AffectusError::StateOutOfRange(_)
            | AffectusError::NoPendingSession { .. }
            | AffectusError::CatalogEmpty => StatusCode::BAD_REQUEST,
            AffectusError::UnknownContent(_) => StatusCode::NOT_FOUND,
            AffectusError::Busy => StatusCode::SERVICE_UNAVAILABLE,
            AffectusError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AffectusError::DependencyFailure(_) | AffectusError::PolicyInconsistency(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
