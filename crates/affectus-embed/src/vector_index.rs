//! In-memory vector index over the affect embedding space.
//!
//! A linear scan is explicitly acceptable for catalogs up to 1e5 items;
//! this keeps the same locking shape as `InMemoryGraphStore` in the memory
//! crate this was grounded on: a single `RwLock<HashMap<...>>`, readers
//! never blocked by other readers.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::embedder::EMBEDDING_DIM;

#[derive(Debug, Clone)]
struct Entry {
    vector: Vec<f64>,
    meta: Value,
}

/// A single ranked hit from `VectorIndex::search`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub content_id: String,
    pub score: f64,
    pub meta: Value,
}

/// Stores content embeddings keyed by content id and returns top-K by
/// cosine similarity.
pub struct VectorIndex {
    entries: RwLock<HashMap<String, Entry>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace the vector for `content_id`. Panics if `vector`
    /// is not exactly `EMBEDDING_DIM` long — this is an internal invariant
    /// violation (only `ContentProfiler`, which always emits
    /// `EMBEDDING_DIM`-length vectors, calls this), not a caller-facing
    /// error condition.
    pub async fn upsert(&self, content_id: impl Into<String>, vector: Vec<f64>, meta: Value) {
        assert_eq!(
            vector.len(),
            EMBEDDING_DIM,
            "VectorIndex::upsert requires a {}-dim vector",
            EMBEDDING_DIM
        );
        let mut entries = self.entries.write().await;
        entries.insert(content_id.into(), Entry { vector, meta });
    }

    pub async fn remove(&self, content_id: &str) {
        self.entries.write().await.remove(content_id);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Top-`k` hits by cosine similarity, descending, ties broken by
    /// content id ascending for determinism.
    pub async fn search(&self, query: &[f64], k: usize) -> Vec<VectorHit> {
        let entries = self.entries.read().await;
        let mut scored: Vec<VectorHit> = entries
            .iter()
            .map(|(id, entry)| VectorHit {
                content_id: id.clone(),
                score: cosine_similarity(query, &entry.vector),
                meta: entry.meta.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.content_id.cmp(&b.content_id))
        });
        scored.truncate(k);
        scored
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Cosine similarity; a zero vector on either side yields score 0 to every
/// query.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
