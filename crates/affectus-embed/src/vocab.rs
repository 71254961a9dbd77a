//! Fixed, versioned vocabularies the embedding segmentation and content
//! profiler rely on. Changing any of these invalidates
//! every previously stored vector — bump `VOCAB_VERSION` when they change.

use affectus_types::PrimaryTone;

/// Bump whenever a vocabulary table below changes shape or values.
pub const VOCAB_VERSION: u32 = 1;

/// The 8-tone vocabulary, in the fixed order the one-hot segment (dims
/// 0–255, stride 32) encodes them.
pub const TONE_VOCAB: [PrimaryTone; 8] = [
    PrimaryTone::Calming,
    PrimaryTone::Serene,
    PrimaryTone::Uplifting,
    PrimaryTone::Energizing,
    PrimaryTone::Intense,
    PrimaryTone::Melancholic,
    PrimaryTone::Neutral,
    PrimaryTone::Playful,
];

pub fn tone_index(tone: PrimaryTone) -> usize {
    TONE_VOCAB
        .iter()
        .position(|t| *t == tone)
        .expect("TONE_VOCAB is exhaustive over PrimaryTone")
}

/// Neutral default used when none of a content item's genres match
/// `GENRE_AFFECT_TABLE`.
pub const NEUTRAL_AFFECT: (f64, f64, f64) = (0.2, 0.1, 0.5);

/// genre (lowercase) -> (valence_delta, arousal_delta, intensity). Changing
/// these values changes every derived profile, so they're kept here as a
/// single documented table rather than scattered literals.
pub const GENRE_AFFECT_TABLE: &[(&str, f64, f64, f64)] = &[
    ("action", 0.3, 0.7, 0.8),
    ("comedy", 0.5, 0.1, 0.6),
    ("documentary", 0.1, -0.1, 0.3),
    ("drama", -0.1, 0.1, 0.5),
    ("horror", -0.5, 0.8, 0.9),
    ("meditation", 0.4, -0.7, 0.2),
    ("music", 0.3, 0.2, 0.4),
    ("thriller", -0.2, 0.7, 0.8),
    ("romance", 0.4, 0.1, 0.4),
    ("animation", 0.4, 0.3, 0.3),
    ("scifi", 0.1, 0.4, 0.6),
    ("fantasy", 0.2, 0.3, 0.5),
    ("sports", 0.3, 0.6, 0.5),
    ("news", -0.3, 0.3, 0.4),
    ("nature", 0.4, -0.5, 0.2),
    ("mystery", -0.1, 0.5, 0.6),
];

/// genre (lowercase) -> primary tone, consulted when no category override
/// applies: the first matching genre in this table wins.
pub const GENRE_TONE_TABLE: &[(&str, PrimaryTone)] = &[
    ("action", PrimaryTone::Energizing),
    ("comedy", PrimaryTone::Playful),
    ("documentary", PrimaryTone::Serene),
    ("drama", PrimaryTone::Melancholic),
    ("horror", PrimaryTone::Intense),
    ("meditation", PrimaryTone::Calming),
    ("music", PrimaryTone::Uplifting),
    ("thriller", PrimaryTone::Intense),
    ("romance", PrimaryTone::Uplifting),
    ("animation", PrimaryTone::Playful),
    ("scifi", PrimaryTone::Neutral),
    ("fantasy", PrimaryTone::Playful),
    ("sports", PrimaryTone::Energizing),
    ("news", PrimaryTone::Neutral),
    ("nature", PrimaryTone::Serene),
    ("mystery", PrimaryTone::Intense),
];

/// category (lowercase) -> primary tone override, checked before the genre
/// table.
pub const CATEGORY_TONE_OVERRIDES: &[(&str, PrimaryTone)] = &[
    ("meditation", PrimaryTone::Calming),
    ("documentary", PrimaryTone::Serene),
    ("music", PrimaryTone::Uplifting),
];

/// Fixed slot order for the genre one-hot/multi-hot segment (1024–1151,
/// up to 128 slots). Any genre not present here is simply not represented
/// in that segment (it still participates in `GENRE_AFFECT_TABLE` lookup).
pub const GENRE_SLOTS: &[&str] = &[
    "action", "comedy", "documentary", "drama", "horror", "meditation", "music", "thriller",
    "romance", "animation", "scifi", "fantasy", "sports", "news", "nature", "mystery",
];

/// Fixed slot order for the category one-hot segment (1152–1279).
pub const CATEGORY_SLOTS: &[&str] = &[
    "film", "series", "meditation", "documentary", "music", "podcast", "short", "special",
];

pub fn genre_slot(genre: &str) -> Option<usize> {
    GENRE_SLOTS.iter().position(|g| *g == genre)
}

pub fn category_slot(category: &str) -> Option<usize> {
    CATEGORY_SLOTS.iter().position(|c| *c == category)
}
