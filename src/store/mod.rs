pub mod disk;
pub mod memory;

use crate::core::cache::KeyValueStore;
use disk::DiskStore;
use memory::MemoryStore;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Opens the persistent store under `data_path`, falling back to memory when
/// the disk store cannot be opened.
pub fn open_store(data_path: &Path) -> Arc<dyn KeyValueStore> {
    let cache_dir = data_path.join("cache");
    match DiskStore::open(&cache_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(
                "Failed to open rate cache at {}: {}. Using in-memory cache.",
                cache_dir.display(),
                e
            );
            Arc::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_store_creates_cache_dir() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        store
            .put_all(vec![("k".to_string(), "v".to_string())])
            .await
            .unwrap();

        assert!(dir.path().join("cache").exists());
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }
}
