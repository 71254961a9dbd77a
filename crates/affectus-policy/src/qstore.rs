//! Persistent map `(user_id, state_key, content_id) -> QEntry`.
//!
//! Linearizability across a user's Q-entries is the caller's job (the
//! engine holds a per-user lock around the whole feedback pipeline); this
//! store itself only needs to be safe for concurrent access, which a
//! `RwLock<HashMap<...>>` provides.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use affectus_store::DurableStore;
use affectus_types::{QEntry, StateKey};
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

type Key = (String, StateKey, String);

pub struct QStore {
    entries: RwLock<HashMap<Key, QEntry>>,
    dirty: RwLock<HashSet<Key>>,
}

impl QStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            dirty: RwLock::new(HashSet::new()),
        }
    }

    /// `None` if no entry has ever been observed for this triple. Reading
    /// a missing entry never creates one and never increments
    /// `visit_count`.
    pub async fn get(&self, user_id: &str, state_key: StateKey, content_id: &str) -> Option<QEntry> {
        self.entries
            .read()
            .await
            .get(&(user_id.to_string(), state_key, content_id.to_string()))
            .cloned()
    }

    /// Write a q-value, creating the entry if absent. Every `put`
    /// increments `visit_count` by 1 and refreshes `last_updated`.
    pub async fn put(&self, user_id: &str, state_key: StateKey, content_id: &str, q_value: f64) -> QEntry {
        let key = (user_id.to_string(), state_key, content_id.to_string());
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key.clone()).or_insert_with(|| QEntry::initial(Utc::now()));
        entry.q_value = q_value;
        entry.visit_count += 1;
        entry.last_updated = Utc::now();
        let result = entry.clone();
        drop(entries);
        self.dirty.write().await.insert(key);
        result
    }

    /// All Q-entries for a user at a state key, for `max_next` lookups and
    /// UCB tie-breaking.
    pub async fn state_entries(&self, user_id: &str, state_key: StateKey) -> Vec<(String, QEntry)> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|((u, s, _), _)| u == user_id && *s == state_key)
            .map(|((_, _, c), entry)| (c.clone(), entry.clone()))
            .collect()
    }

    /// Highest q at a state key; ties broken by content id ascending.
    pub async fn best(&self, user_id: &str, state_key: StateKey) -> Option<(String, f64)> {
        let mut candidates = self.state_entries(user_id, state_key).await;
        candidates.sort_by(|a, b| {
            b.1.q_value
                .partial_cmp(&a.1.q_value)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        candidates.into_iter().next().map(|(id, e)| (id, e.q_value))
    }

    /// Max q over all entries at a state key, or 0 if the user has never
    /// visited it (an unvisited state contributes no future value).
    pub async fn max_at(&self, user_id: &str, state_key: StateKey) -> f64 {
        self.state_entries(user_id, state_key)
            .await
            .iter()
            .map(|(_, e)| e.q_value)
            .fold(f64::NEG_INFINITY, f64::max)
            .max(0.0)
    }

    /// Load every persisted Q-entry for `user_id` from a durable store,
    /// keyed as `user:{id}:qtable:{state_key}:{content_id}`.
    pub async fn load_user(&self, user_id: &str, store: &Arc<dyn DurableStore>) -> affectus_store::Result<()> {
        let prefix = format!("user:{user_id}:qtable:");
        let rows = store.range(&prefix).await?;
        let mut entries = self.entries.write().await;
        for (key, value) in rows {
            if let Some((state_str, content_id)) = parse_qtable_key(&key, user_id) {
                if let (Some(state_key), Ok(entry)) = (parse_state_key(&state_str), serde_json::from_value::<QEntry>(value)) {
                    entries.insert((user_id.to_string(), state_key, content_id), entry);
                }
            }
        }
        Ok(())
    }

    /// Flush dirty entries to a durable store and clear the dirty set.
    /// Callers decide the coalescing window around this call.
    pub async fn flush_dirty(&self, store: &Arc<dyn DurableStore>) -> affectus_store::Result<usize> {
        let dirty_keys: Vec<Key> = self.dirty.read().await.iter().cloned().collect();
        let entries = self.entries.read().await;
        let mut flushed = 0;
        for key @ (user_id, state_key, content_id) in &dirty_keys {
            if let Some(entry) = entries.get(key) {
                let wire_key = format!("user:{user_id}:qtable:{state_key}:{content_id}");
                store.put(&wire_key, json!(entry)).await?;
                flushed += 1;
            }
        }
        drop(entries);
        let mut dirty = self.dirty.write().await;
        for key in &dirty_keys {
            dirty.remove(key);
        }
        Ok(flushed)
    }
}

impl Default for QStore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_qtable_key<'a>(key: &'a str, user_id: &str) -> Option<(String, String)> {
    let prefix = format!("user:{user_id}:qtable:");
    let rest = key.strip_prefix(&prefix)?;
    let mut parts = rest.splitn(2, ':');
    let state_part = parts.next()?;
    // state_key itself has two colons (v:a:s), so re-join the remaining
    // two segments to reconstruct it before taking the content id.
    let remainder = parts.next()?;
    let mut remainder_parts = remainder.splitn(2, ':');
    let a = remainder_parts.next()?;
    let rest2 = remainder_parts.next()?;
    let mut rest2_parts = rest2.splitn(2, ':');
    let s = rest2_parts.next()?;
    let content_id = rest2_parts.next()?;
    Some((format!("{state_part}:{a}:{s}"), content_id.to_string()))
}

fn parse_state_key(s: &str) -> Option<StateKey> {
    let mut parts = s.splitn(3, ':');
    let v = parts.next()?.parse().ok()?;
    let a = parts.next()?.parse().ok()?;
    let sb = parts.next()?.parse().ok()?;
    Some(StateKey { v_bucket: v, a_bucket: a, s_bucket: sb })
}
