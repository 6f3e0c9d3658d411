use crate::core::cache::KeyValueStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "rates";

/// fjall-backed store that survives process restarts.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create cache directory: {}", path.display()))?;
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open cache keyspace: {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open cache partition")?;
        debug!("Opened disk store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl KeyValueStore for DiskStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.partition.get(key)?;
        value
            .map(|v| String::from_utf8(v.to_vec()).context("Cache value is not UTF-8"))
            .transpose()
    }

    async fn put_all(&self, entries: Vec<(String, String)>) -> Result<()> {
        let mut batch = self.keyspace.batch();
        for (key, value) in &entries {
            batch.insert(&self.partition, key.as_str(), value.as_str());
        }
        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for {} keys", entries.len());
        Ok(())
    }

    async fn remove_all(&self, keys: Vec<String>) -> Result<()> {
        let mut batch = self.keyspace.batch();
        for key in &keys {
            batch.remove(&self.partition, key.as_str());
        }
        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store REMOVE for {} keys", keys.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_store_get_put() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

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
    }

    #[tokio::test]
    async fn test_disk_store_remove() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        store
            .put_all(vec![("key1".to_string(), "a".to_string())])
            .await
            .unwrap();
        store.remove_all(vec!["key1".to_string()]).await.unwrap();

        assert!(store.get("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store
                .put_all(vec![("key1".to_string(), "a".to_string())])
                .await
                .unwrap();
        }

        let store = DiskStore::open(dir.path()).unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some("a".to_string()));
    }
}
