// ABOUTME: SQLite implementation of the record store using sqlx
// ABOUTME: A single records table keyed by (collection, key) with upsert writes

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{validate_key, Collection, RecordStore, StorageError, StorageResult, StoredRecord};

const CREATE_RECORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    collection TEXT NOT NULL,
    key TEXT NOT NULL,
    data TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (collection, key)
)
"#;

/// SQLite implementation of RecordStore
pub struct SqliteStore {
    pool: SqlitePool,
    location: String,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`
    pub async fn new(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;

        Ok(Self {
            pool,
            location: path.display().to_string(),
        })
    }

    /// Private in-memory database, mainly for tests
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // Every connection would get its own database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool,
            location: ":memory:".to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.location)
    }

    fn row_to_record(row: &SqliteRow) -> StorageResult<StoredRecord> {
        let key: String = row.try_get("key")?;
        let data_json: String = row.try_get("data")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        let data: Value = serde_json::from_str(&data_json)?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::Database(format!("Invalid timestamp for {}: {}", key, e)))?;

        Ok(StoredRecord {
            key,
            data,
            updated_at,
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn initialize(&self) -> StorageResult<()> {
        sqlx::query(CREATE_RECORDS_TABLE).execute(&self.pool).await?;
        debug!("Initialized SQLite store at {}", self.location);
        Ok(())
    }

    async fn put(&self, collection: Collection, key: &str, data: &Value) -> StorageResult<()> {
        validate_key(key)?;
        let data_json = serde_json::to_string(data)?;

        sqlx::query(
            r#"
            INSERT INTO records (collection, key, data, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(collection, key) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(key)
        .bind(&data_json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Upserted {}/{}", collection, key);
        Ok(())
    }

    async fn get(&self, collection: Collection, key: &str) -> StorageResult<Option<StoredRecord>> {
        validate_key(key)?;
        let row = sqlx::query(
            "SELECT key, data, updated_at FROM records WHERE collection = ? AND key = ?",
        )
        .bind(collection.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn get_all(&self, collection: Collection) -> StorageResult<Vec<StoredRecord>> {
        let rows = sqlx::query(
            "SELECT key, data, updated_at FROM records WHERE collection = ? ORDER BY key",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match Self::row_to_record(row) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable row in {}: {}", collection, e),
            }
        }
        Ok(records)
    }

    async fn delete(&self, collection: Collection, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        let result = sqlx::query("DELETE FROM records WHERE collection = ? AND key = ?")
            .bind(collection.as_str())
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn describe(&self) -> String {
        format!("SQLite database at {}", self.location)
    }
}
