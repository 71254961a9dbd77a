//! Experience log records and pending-recommendation session entries.

use crate::state::{AffectState, DesiredState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed (before, action, after, reward) transition, appended to the
/// per-user experience log. Append-only; the log is a bounded ring of the
/// most recent N records (default 1000) — older ones may be dropped, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub state_before: AffectState,
    pub content_id: String,
    pub state_after: AffectState,
    pub desired_state: DesiredState,
    pub reward: f64,
    pub completed: bool,
    pub watch_duration: f64,
    pub total_duration: f64,
    pub rating: Option<f64>,
    /// Whether this item was surfaced via exploration injection rather than
    /// pure policy ranking (used by ProgressAnalytics' exploit/explore split).
    pub was_exploration: bool,
}

/// Pending recommendation, recoverable by `(user_id, content_id)` so that
/// a later `feedback` call can resolve `state_before`/`desired_state`
/// without the client having to echo them back. TTL 24h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub state_before: AffectState,
    pub desired_state: DesiredState,
    pub issued_at: DateTime<Utc>,
    /// Whether this recommendation was surfaced via exploration injection,
    /// carried forward into the `Experience` record at feedback time.
    pub was_exploration: bool,
}

impl SessionEntry {
    pub fn is_expired(&self, now: DateTime<Utc>, ttl_seconds: i64) -> bool {
        (now - self.issued_at).num_seconds() >= ttl_seconds
    }
}
