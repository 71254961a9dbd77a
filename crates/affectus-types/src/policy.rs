//! Q-learning and exploration state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored estimate of expected return for selecting a content item at a
/// state key, for one user. Created lazily on first read/write, never
/// deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QEntry {
    pub q_value: f64,
    pub visit_count: u64,
    pub last_updated: DateTime<Utc>,
}

impl QEntry {
    /// Neutral default on first observation: 0.0.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            q_value: 0.0,
            visit_count: 0,
            last_updated: now,
        }
    }
}

/// Per-user exploration bookkeeping: decaying epsilon plus a running reward
/// average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationState {
    pub epsilon: f64,
    pub total_experiences: u64,
    pub avg_reward: f64,
    pub last_updated: DateTime<Utc>,
}

impl ExplorationState {
    pub fn initial(epsilon_initial: f64, now: DateTime<Utc>) -> Self {
        Self {
            epsilon: epsilon_initial,
            total_experiences: 0,
            avg_reward: 0.0,
            last_updated: now,
        }
    }
}
