// ABOUTME: Storage factory that picks the record store backend at startup
// ABOUTME: Also provides typed convenience methods over any RecordStore

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{Collection, JsonFileStore, RecordStore, SqliteStore, StorageResult};

/// Which backend to open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum StorageConfig {
    Files { root: PathBuf },
    Sqlite { path: PathBuf },
}

/// Factory for creating storage instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create and initialize a store from configuration
    pub async fn create_store(config: StorageConfig) -> StorageResult<Arc<dyn RecordStore>> {
        debug!("Creating storage with config: {:?}", config);

        let store: Arc<dyn RecordStore> = match config {
            StorageConfig::Files { root } => {
                info!("Using JSON file storage at: {:?}", root);
                Arc::new(JsonFileStore::new(root))
            }
            StorageConfig::Sqlite { path } => {
                info!("Using SQLite storage at: {:?}", path);
                Arc::new(SqliteStore::new(path).await?)
            }
        };

        store.initialize().await?;
        Ok(store)
    }
}

/// Typed access on top of the JSON-level RecordStore
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    async fn put_record<T>(&self, collection: Collection, key: &str, record: &T) -> StorageResult<()>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(record)?;
        self.put(collection, key, &value).await
    }

    async fn get_record<T>(&self, collection: Collection, key: &str) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(collection, key).await? {
            Some(record) => Ok(Some(serde_json::from_value(record.data)?)),
            None => Ok(None),
        }
    }

    /// Every record that deserializes as `T`, paired with its key
    async fn list_records<T>(&self, collection: Collection) -> StorageResult<Vec<(String, T)>>
    where
        T: DeserializeOwned + Send,
    {
        let records = self.get_all(collection).await?;
        let mut typed = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_value::<T>(record.data) {
                Ok(value) => typed.push((record.key, value)),
                Err(e) => warn!("Skipping malformed {}/{}: {}", collection, record.key, e),
            }
        }
        Ok(typed)
    }

    async fn exists(&self, collection: Collection, key: &str) -> StorageResult<bool> {
        Ok(self.get(collection, key).await?.is_some())
    }
}

// Blanket implementation for all RecordStore types
impl<T: RecordStore + ?Sized> RecordStoreExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[tokio::test]
    async fn test_factory_creates_file_store() {
        let dir = tempdir().unwrap();
        let store = StorageFactory::create_store(StorageConfig::Files {
            root: dir.path().to_path_buf(),
        })
        .await
        .unwrap();

        assert!(dir.path().join("requests").is_dir());
        assert!(store.describe().contains("JSON files"));
    }

    #[tokio::test]
    async fn test_factory_creates_sqlite_store() {
        let dir = tempdir().unwrap();
        let store = StorageFactory::create_store(StorageConfig::Sqlite {
            path: dir.path().join("test.db"),
        })
        .await
        .unwrap();

        assert!(store.get_all(Collection::Drafts).await.unwrap().is_empty());
        assert!(store.describe().contains("SQLite"));
    }

    #[tokio::test]
    async fn test_typed_records_skip_malformed_entries() {
        let dir = tempdir().unwrap();
        let store = StorageFactory::create_store(StorageConfig::Files {
            root: dir.path().to_path_buf(),
        })
        .await
        .unwrap();

        store
            .put_record(Collection::Requests, "good", &Note { text: "hi".into() })
            .await
            .unwrap();
        store
            .put(Collection::Requests, "bad", &json!({"unexpected": 1}))
            .await
            .unwrap();

        let notes: Vec<(String, Note)> = store.list_records(Collection::Requests).await.unwrap();
        assert_eq!(notes, vec![("good".to_string(), Note { text: "hi".into() })]);

        let note: Option<Note> = store.get_record(Collection::Requests, "good").await.unwrap();
        assert_eq!(note.unwrap().text, "hi");
        assert!(store.exists(Collection::Requests, "bad").await.unwrap());
    }
}
