//! Startup-time catalog loading: profiles every item in a JSON array of
//! `ContentMetadata` into the shared `ContentProfiler`/`VectorIndex`.
//!
//! There is no ingestion endpoint; the catalog is immutable after this
//! runs, matching the concurrency guarantee that readers never take a lock.

use std::path::Path;

use affectus_engine::EngineContext;
use affectus_types::ContentMetadata;
use tracing::{info, warn};

pub async fn load_from_file(ctx: &EngineContext, path: impl AsRef<Path>) -> anyhow::Result<usize> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await?;
    let items: Vec<ContentMetadata> = serde_json::from_str(&raw)?;

    let mut loaded = 0;
    for item in &items {
        match ctx.profiler.profile(item).await {
            Ok(_) => loaded += 1,
            Err(err) => warn!(content_id = %item.content_id, error = %err, "skipped catalog item"),
        }
    }
    info!(path = %path.display(), loaded, total = items.len(), "catalog loaded");
    Ok(loaded)
}
