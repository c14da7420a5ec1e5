// ABOUTME: Storage migration command for the elbitat CLI
// ABOUTME: Copies every record from the configured backend into the other one

use colored::*;
use elbitat_storage::{migrate_records, StorageFactory};

use elbitat_cli::{AppContext, StorageBackend};

use super::utils::new_table;

pub async fn migrate_storage(
    ctx: &AppContext,
    to: StorageBackend,
) -> Result<(), Box<dyn std::error::Error>> {
    let from = ctx.config.storage_backend;
    if from == to {
        return Err(format!("Storage already uses the {} backend", to).into());
    }

    let target = StorageFactory::create_store(ctx.config.storage_config_for(to)).await?;
    println!(
        "{}",
        format!("Migrating records: {} -> {}", from, to).blue().bold()
    );

    let source = ctx.store();
    let report = migrate_records(source.as_ref(), target.as_ref()).await?;

    let mut table = new_table();
    table.set_header(vec!["Collection", "Copied"]);
    for (collection, copied) in &report.copied {
        table.add_row(vec![collection.clone(), copied.to_string()]);
    }
    println!("{}", table);
    println!("Total: {} records copied", report.total_copied().to_string().cyan());

    if report.failed > 0 {
        println!(
            "{}",
            format!("{} record(s) could not be copied, see the log", report.failed).yellow()
        );
    }
    println!(
        "{}",
        format!("Set ELBITAT_STORAGE={} to use the new backend", to).dimmed()
    );
    Ok(())
}
