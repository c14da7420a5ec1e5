// ABOUTME: Copies every collection from one record store into another
// ABOUTME: Used when switching the workspace between JSON files and SQLite

use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::{Collection, RecordStore, StorageResult};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records copied per collection name
    pub copied: BTreeMap<String, usize>,
    pub failed: usize,
}

impl MigrationReport {
    pub fn total_copied(&self) -> usize {
        self.copied.values().sum()
    }
}

/// Copy all records; existing keys in the target are overwritten
pub async fn migrate_records(
    from: &dyn RecordStore,
    to: &dyn RecordStore,
) -> StorageResult<MigrationReport> {
    info!("Migrating records from {} to {}", from.describe(), to.describe());
    to.initialize().await?;

    let mut report = MigrationReport::default();
    for collection in Collection::ALL {
        let records = from.get_all(collection).await?;
        let mut copied = 0;
        for record in records {
            match to.put(collection, &record.key, &record.data).await {
                Ok(()) => copied += 1,
                Err(e) => {
                    warn!("Failed to migrate {}/{}: {}", collection, record.key, e);
                    report.failed += 1;
                }
            }
        }
        report.copied.insert(collection.as_str().to_string(), copied);
    }

    info!(
        "Migration finished: {} copied, {} failed",
        report.total_copied(),
        report.failed
    );
    Ok(report)
}
