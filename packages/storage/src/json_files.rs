// ABOUTME: Record store backed by one pretty-printed JSON file per record
// ABOUTME: Layout is <root>/<collection>/<key>.json

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::{validate_key, Collection, RecordStore, StorageResult, StoredRecord};

const EXTENSION: &str = "json";

pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.as_str())
    }

    fn record_path(&self, collection: Collection, key: &str) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{}.{}", key, EXTENSION))
    }

    async fn read_record(path: &Path, key: &str) -> StorageResult<StoredRecord> {
        let contents = fs::read_to_string(path).await?;
        let data: Value = serde_json::from_str(&contents)?;
        let updated_at = fs::metadata(path)
            .await?
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(StoredRecord {
            key: key.to_string(),
            data,
            updated_at,
        })
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn initialize(&self) -> StorageResult<()> {
        for collection in Collection::ALL {
            fs::create_dir_all(self.collection_dir(collection)).await?;
        }
        debug!("Initialized JSON file store at {:?}", self.root);
        Ok(())
    }

    async fn put(&self, collection: Collection, key: &str, data: &Value) -> StorageResult<()> {
        validate_key(key)?;
        fs::create_dir_all(self.collection_dir(collection)).await?;

        let path = self.record_path(collection, key);
        let tmp_path = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(data)?;

        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, &path).await?;
        debug!("Wrote {}/{}", collection, key);
        Ok(())
    }

    async fn get(&self, collection: Collection, key: &str) -> StorageResult<Option<StoredRecord>> {
        validate_key(key)?;
        let path = self.record_path(collection, key);
        match Self::read_record(&path, key).await {
            Ok(record) => Ok(Some(record)),
            Err(crate::StorageError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_all(&self, collection: Collection) -> StorageResult<Vec<StoredRecord>> {
        let dir = self.collection_dir(collection);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match Self::read_record(&path, key).await {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable record {:?}: {}", path, e),
            }
        }

        records.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(records)
    }

    async fn delete(&self, collection: Collection, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        match fs::remove_file(self.record_path(collection, key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        format!("JSON files at {}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_get_and_overwrite() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.initialize().await.unwrap();

        store
            .put(Collection::Drafts, "summer.draft", &json!({"v": 1}))
            .await
            .unwrap();
        store
            .put(Collection::Drafts, "summer.draft", &json!({"v": 2}))
            .await
            .unwrap();

        let record = store
            .get(Collection::Drafts, "summer.draft")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.data, json!({"v": 2}));
        assert!(dir.path().join("drafts/summer.draft.json").exists());
        assert_eq!(store.get_all(Collection::Drafts).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_all_skips_corrupt_files() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.initialize().await.unwrap();

        store
            .put(Collection::Requests, "b", &json!({"title": "B"}))
            .await
            .unwrap();
        store
            .put(Collection::Requests, "a", &json!({"title": "A"}))
            .await
            .unwrap();
        std::fs::write(dir.path().join("requests/broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("requests/notes.txt"), "ignored").unwrap();

        let records = store.get_all(Collection::Requests).await.unwrap();
        let keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_missing_collection_and_record() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("never-created"));

        assert!(store.get_all(Collection::Posted).await.unwrap().is_empty());
        assert!(store.get(Collection::Posted, "x").await.unwrap().is_none());
        assert!(!store.delete(Collection::Posted, "x").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_and_invalid_key() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store
            .put(Collection::Contacts, "guest@hotel.it", &json!({}))
            .await
            .unwrap();
        assert!(store.delete(Collection::Contacts, "guest@hotel.it").await.unwrap());
        assert!(store.get(Collection::Contacts, "guest@hotel.it").await.unwrap().is_none());

        let err = store
            .put(Collection::Contacts, "../escape", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
