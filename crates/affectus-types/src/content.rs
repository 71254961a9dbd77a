//! Content catalog metadata and the derived, immutable content profile.

use serde::{Deserialize, Serialize};

/// Raw catalog metadata as ingested from the client collaborator. Not part
/// of the learning core's invariants on its own; `ContentProfiler` derives
/// a `ContentProfile` from it deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub content_id: String,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub category: String,
    pub duration_minutes: f64,
}

/// Fixed small vocabulary of primary emotional tones a content item can be
/// tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryTone {
    Calming,
    Serene,
    Uplifting,
    Energizing,
    Intense,
    Melancholic,
    Neutral,
    Playful,
}

impl PrimaryTone {
    /// The 4-tone fallback cycle used when neither category nor genre match:
    /// picked deterministically from the content id's first-character parity.
    pub const FALLBACK_CYCLE: [PrimaryTone; 4] = [
        PrimaryTone::Neutral,
        PrimaryTone::Calming,
        PrimaryTone::Playful,
        PrimaryTone::Melancholic,
    ];
}

/// One anchor point a content item is known to nudge a viewer towards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetAnchor {
    pub valence: f64,
    pub arousal: f64,
}

/// Immutable, deterministic emotional-effect summary of a catalog item.
/// Same metadata always derives the same profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentProfile {
    pub content_id: String,
    pub primary_tone: PrimaryTone,
    pub valence_delta: f64,
    pub arousal_delta: f64,
    pub intensity: f64,
    pub complexity: f64,
    pub target_states: Vec<TargetAnchor>,
    pub duration_minutes: f64,
    pub category: String,
    pub genres: Vec<String>,
}
