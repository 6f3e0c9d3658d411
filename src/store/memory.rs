use crate::core::cache::KeyValueStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory store, lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self.inner.lock().await;
        Ok(store.get(key).cloned())
    }

    async fn put_all(&self, entries: Vec<(String, String)>) -> Result<()> {
        let mut store = self.inner.lock().await;
        for (key, value) in entries {
            debug!("Store PUT for key: {}", key);
            store.insert(key, value);
        }
        Ok(())
    }

    async fn remove_all(&self, keys: Vec<String>) -> Result<()> {
        let mut store = self.inner.lock().await;
        for key in keys {
            debug!("Store REMOVE for key: {}", key);
            store.remove(&key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_get_put() {
        let store = MemoryStore::new();

        assert!(store.get("key1").await.unwrap().is_none());

        store
            .put_all(vec![
                ("key1".to_string(), "a".to_string()),
                ("key2".to_string(), "b".to_string()),
            ])
            .await
            .unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some("a".to_string()));
        assert_eq!(store.get("key2").await.unwrap(), Some("b".to_string()));
        assert!(store.get("key3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_remove() {
        let store = MemoryStore::new();

        store
            .put_all(vec![
                ("key1".to_string(), "a".to_string()),
                ("key2".to_string(), "b".to_string()),
            ])
            .await
            .unwrap();
        store.remove_all(vec!["key1".to_string()]).await.unwrap();

        assert!(store.get("key1").await.unwrap().is_none());
        assert_eq!(store.get("key2").await.unwrap(), Some("b".to_string()));
    }
}
