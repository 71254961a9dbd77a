//! The durable-store interface the core consumes.
//!
//! Durable storage engines are an external collaborator — this crate
//! defines the interface (`Get`, `Put`, `Range`) and ships only an
//! in-memory reference implementation for tests and development.
//! Grounded on the `GraphStore`/`InMemoryGraphStore` trait-plus-in-memory-
//! impl idiom.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("durable store unreachable: {0}")]
    Unreachable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable key-value interface for Q-entries, exploration state,
/// experiences and sessions.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn put(&self, key: &str, value: Value) -> Result<()>;
    /// All entries whose key starts with `prefix`, in key order.
    async fn range(&self, prefix: &str) -> Result<Vec<(String, Value)>>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory `DurableStore`. Uses a `BTreeMap` so `range` returns entries
/// in deterministic key order without an explicit sort.
#[derive(Default)]
pub struct InMemoryDurableStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl InMemoryDurableStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Snapshot the entire store, for diagnostics/tests.
    pub async fn snapshot(&self) -> HashMap<String, Value> {
        self.entries.read().await.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

#[async_trait]
impl DurableStore for InMemoryDurableStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn range(&self, prefix: &str) -> Result<Vec<(String, Value)>> {
        Ok(self
            .entries
            .read()
            .await
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn range_is_prefix_scoped_and_ordered() {
        let store = InMemoryDurableStore::new();
        store.put("user:a:qtable:1:c1", json!(1)).await.unwrap();
        store.put("user:a:qtable:2:c1", json!(2)).await.unwrap();
        store.put("user:b:qtable:1:c1", json!(3)).await.unwrap();

        let hits = store.range("user:a:qtable:").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, "user:a:qtable:1:c1");
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let store = InMemoryDurableStore::new();
        store.put("k", json!(1)).await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
