// ABOUTME: Record store interface shared by every collection the agent persists
// ABOUTME: One trait with JSON-file and SQLite implementations selected at startup

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod factory;
pub mod json_files;
pub mod migrate;
pub mod sqlite;

pub use factory::{RecordStoreExt, StorageConfig, StorageFactory};
pub use json_files::JsonFileStore;
pub use migrate::{migrate_records, MigrationReport};
pub use sqlite::SqliteStore;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Invalid record key: '{0}'")]
    InvalidKey(String),
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Named group of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Requests,
    Drafts,
    Scheduled,
    Posted,
    Contacts,
    EmailCampaigns,
    EmailSends,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Requests,
        Collection::Drafts,
        Collection::Scheduled,
        Collection::Posted,
        Collection::Contacts,
        Collection::EmailCampaigns,
        Collection::EmailSends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Requests => "requests",
            Collection::Drafts => "drafts",
            Collection::Scheduled => "scheduled",
            Collection::Posted => "posted",
            Collection::Contacts => "contacts",
            Collection::EmailCampaigns => "email_campaigns",
            Collection::EmailSends => "email_sends",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| StorageError::UnknownCollection(s.to_string()))
    }
}

/// A stored JSON document and its key
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub key: String,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}

/// Main storage trait that all record stores implement.
///
/// Writes replace the whole record; the last write to a key wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create directories or tables
    async fn initialize(&self) -> StorageResult<()>;

    async fn put(&self, collection: Collection, key: &str, data: &Value) -> StorageResult<()>;

    async fn get(&self, collection: Collection, key: &str) -> StorageResult<Option<StoredRecord>>;

    /// Every record in the collection, sorted by key
    async fn get_all(&self, collection: Collection) -> StorageResult<Vec<StoredRecord>>;

    /// Returns whether a record was removed
    async fn delete(&self, collection: Collection, key: &str) -> StorageResult<bool>;

    /// Human-readable location, used in logs and the CLI
    fn describe(&self) -> String;
}

/// Keys double as file names, so anything that could escape the collection is rejected
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains('/')
        || key.contains('\\')
        || key.contains("..")
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
