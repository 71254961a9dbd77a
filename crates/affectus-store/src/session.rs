//! Pending-recommendation session store.
//!
//! Recovers `state_before`/`desired_state` for a `feedback` call. TTL 24h
//! by default; a periodic sweeper reaps expired entries.

use std::collections::HashMap;
use std::time::Duration;

use affectus_types::SessionEntry;
use chrono::Utc;
use tokio::sync::RwLock;

pub struct SessionStore {
    entries: RwLock<HashMap<(String, String), SessionEntry>>,
    ttl_seconds: i64,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_seconds: ttl.as_secs() as i64,
        }
    }

    pub async fn put(&self, user_id: &str, content_id: &str, entry: SessionEntry) {
        self.entries
            .write()
            .await
            .insert((user_id.to_string(), content_id.to_string()), entry);
    }

    /// Recover a pending session, `None` if absent or expired (expired
    /// entries are treated as absent but not proactively removed here —
    /// the sweeper owns removal).
    pub async fn get(&self, user_id: &str, content_id: &str) -> Option<SessionEntry> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(user_id.to_string(), content_id.to_string()))?;
        if entry.is_expired(Utc::now(), self.ttl_seconds) {
            None
        } else {
            Some(entry.clone())
        }
    }

    pub async fn remove(&self, user_id: &str, content_id: &str) {
        self.entries
            .write()
            .await
            .remove(&(user_id.to_string(), content_id.to_string()));
    }

    /// Reap entries older than the TTL. Returns the number removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let ttl = self.ttl_seconds;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, ttl));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
