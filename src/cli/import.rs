//! CLI command handler for JSON import
//!
//! An import replaces every client, service order and purchase with the
//! contents of the file. Without `--force` only a preview is printed.

use std::path::Path;

use crate::config::settings::Settings;
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::Snapshot;
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    file: &Path,
    force: bool,
) -> BackofficeResult<()> {
    if !file.exists() {
        return Err(BackofficeError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let snapshot = Snapshot::read_from(file)?;
    let incoming = snapshot.counts();
    let current = storage.counts()?;

    println!("Import Preview");
    println!("{}", "=".repeat(40));
    println!("  File:     {}", file.display());
    if let Some(date) = snapshot.export_date {
        println!("  Exported: {}", date.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("  Current:  {}", current);
    println!("  Incoming: {}", incoming);
    println!();

    if !force {
        println!("WARNING: This will replace ALL current data!");
        println!("To proceed, run again with --force flag:");
        println!("  backoffice import {} --force", file.display());
        return Ok(());
    }

    let result = ImportService::new(storage, settings)
        .import_snapshot(snapshot, &file.display().to_string())?;

    if let Some(backup) = &result.backup {
        println!("Previous data backed up to: {}", backup.display());
    }
    if result.orphaned_orders > 0 {
        println!(
            "Warning: {} service order(s) reference clients not present in the file",
            result.orphaned_orders
        );
    }
    println!("Imported {}", result.counts);

    Ok(())
}
