// ABOUTME: Integration tests for moving records between storage backends
// ABOUTME: Files to SQLite and back must preserve every collection

use elbitat_storage::{
    migrate_records, Collection, JsonFileStore, RecordStore, SqliteStore,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn test_files_to_sqlite_copies_every_collection() {
    let dir = tempdir().unwrap();
    let files = JsonFileStore::new(dir.path().join("files"));
    files.initialize().await.unwrap();

    files
        .put(Collection::Requests, "summer", &json!({"title": "Summer"}))
        .await
        .unwrap();
    files
        .put(Collection::Drafts, "summer.draft", &json!({"request": {}}))
        .await
        .unwrap();
    files
        .put(Collection::Contacts, "info@hotel.it", &json!({"email": "info@hotel.it"}))
        .await
        .unwrap();

    let sqlite = SqliteStore::new(dir.path().join("elbitat.db")).await.unwrap();
    let report = migrate_records(&files, &sqlite).await.unwrap();

    assert_eq!(report.total_copied(), 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.copied.get("drafts"), Some(&1));
    assert_eq!(
        sqlite
            .get(Collection::Contacts, "info@hotel.it")
            .await
            .unwrap()
            .unwrap()
            .data,
        json!({"email": "info@hotel.it"})
    );
}

#[tokio::test]
async fn test_sqlite_to_files_overwrites_existing_keys() {
    let dir = tempdir().unwrap();
    let sqlite = SqliteStore::in_memory().await.unwrap();
    sqlite.initialize().await.unwrap();
    sqlite
        .put(Collection::Scheduled, "a.scheduled", &json!({"approved": true}))
        .await
        .unwrap();

    let files = JsonFileStore::new(dir.path());
    files
        .put(Collection::Scheduled, "a.scheduled", &json!({"approved": false}))
        .await
        .unwrap();

    migrate_records(&sqlite, &files).await.unwrap();

    let record = files
        .get(Collection::Scheduled, "a.scheduled")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.data, json!({"approved": true}));
}
