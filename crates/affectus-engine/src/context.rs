//! Dependency-injection container wiring the policy, embedding, store and
//! oracle crates together, plus per-user mutation serialization.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use affectus_config::AffectusConfig;
use affectus_embed::{ContentProfiler, VectorIndex};
use affectus_oracle::AffectOracle;
use affectus_policy::{ExplorationController, QStore, RewardCalculator};
use affectus_store::{ExperienceLog, SessionStore};
use affectus_types::Result;
use tokio::sync::Mutex;

/// Keyed per-user locks so that `feedback` for one user never blocks
/// `recommend`/`feedback` for another; everything within one user's lock
/// is effectively single-writer.
pub struct UserLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(user_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Run `f` while holding the per-user lock, rejecting with `Busy` if it
    /// cannot be acquired within `backpressure_threshold`.
    pub async fn with_lock<F, Fut, T>(&self, user_id: &str, backpressure_threshold: Duration, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let lock = self.lock_for(user_id).await;
        let guard = match tokio::time::timeout(backpressure_threshold, lock.lock()).await {
            Ok(guard) => guard,
            Err(_) => return Err(affectus_types::AffectusError::Busy),
        };
        let result = f().await;
        drop(guard);
        result
    }
}

impl Default for UserLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the recommendation/feedback/progress pipelines need, built
/// once at startup and shared behind `Arc`s by `affectus-server`.
pub struct EngineContext {
    pub config: AffectusConfig,
    pub qstore: QStore,
    pub exploration: ExplorationController,
    pub experience_log: ExperienceLog,
    pub sessions: SessionStore,
    pub vector_index: Arc<VectorIndex>,
    pub profiler: ContentProfiler,
    pub reward_calculator: RewardCalculator,
    pub oracle: Arc<dyn AffectOracle>,
    pub user_locks: UserLocks,
}

impl EngineContext {
    pub fn new(config: AffectusConfig, oracle: Arc<dyn AffectOracle>) -> Self {
        let vector_index = Arc::new(VectorIndex::new());
        Self {
            qstore: QStore::new(),
            exploration: ExplorationController::new(config.epsilon_initial, config.epsilon_min, config.epsilon_decay),
            experience_log: ExperienceLog::new(config.experience_ring),
            sessions: SessionStore::new(config.session_ttl),
            profiler: ContentProfiler::new(vector_index.clone()),
            vector_index,
            reward_calculator: RewardCalculator::new(config.reward_proximity_threshold),
            oracle,
            user_locks: UserLocks::new(),
            config,
        }
    }
}
