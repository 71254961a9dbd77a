//! Error kinds shared across the affect-aware recommendation core.
//!
//! Every fallible core operation returns `Result<T, AffectusError>`; the HTTP
//! boundary (affectus-server) maps variants to status codes and stable
//! `E00x` error codes.

use thiserror::Error;

/// Errors raised anywhere in the affect-aware recommendation core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AffectusError {
    /// Malformed or out-of-range input that was rejected rather than clamped
    /// (e.g. non-finite floats).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Affect state axis is out of its documented domain and cannot be
    /// repaired by clamping (only used for non-finite values; in-range
    /// clamping never errors).
    #[error("state out of range: {0}")]
    StateOutOfRange(String),

    /// Feedback arrived for a (user, content) pair with no matching pending
    /// recommendation session, or the session has expired.
    #[error("no pending recommendation session for user={user_id} content={content_id}")]
    NoPendingSession { user_id: String, content_id: String },

    /// The catalog has no content at all; recommend() degrades to an empty
    /// list rather than erroring, this variant exists for callers that want
    /// to distinguish the condition explicitly.
    #[error("content catalog is empty")]
    CatalogEmpty,

    /// Referenced content id is not known to the ContentProfiler/VectorIndex.
    #[error("unknown content id: {0}")]
    UnknownContent(String),

    /// An external collaborator (oracle, durable store) failed after
    /// exhausting its retry budget.
    #[error("dependency failure: {0}")]
    DependencyFailure(String),

    /// An internal invariant was violated (e.g. a vector index upsert with
    /// the wrong dimensionality). Logged and fatal to the request.
    #[error("internal invariant violated: {0}")]
    PolicyInconsistency(String),

    /// The per-user lock would have been held past the configured
    /// backpressure threshold.
    #[error("busy: per-user operation would exceed the backpressure threshold")]
    Busy,

    /// A caller-facing rate limit was exceeded.
    #[error("rate limited")]
    RateLimited,
}

impl AffectusError {
    /// Stable error code surfaced in the JSON envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AffectusError::InvalidInput(_)
            | AffectusError::StateOutOfRange(_)
            | AffectusError::NoPendingSession { .. }
            | AffectusError::CatalogEmpty => "E003",
            AffectusError::UnknownContent(_) => "E005",
            AffectusError::DependencyFailure(_) => "E010",
            AffectusError::PolicyInconsistency(_) => "E010",
            AffectusError::Busy => "E010",
            AffectusError::RateLimited => "E010",
        }
    }

    /// `details.reason` value for recommend-side E003s, when applicable.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            AffectusError::NoPendingSession { .. } => Some("no_pending_session"),
            AffectusError::CatalogEmpty => Some("catalog_empty"),
            AffectusError::StateOutOfRange(_) => Some("state_out_of_range"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AffectusError>;
