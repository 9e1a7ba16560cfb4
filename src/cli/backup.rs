//! Backup CLI commands

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::BackupManager;
use crate::clock::{Clock, SystemClock};
use crate::config::settings::Settings;
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::Snapshot;
use crate::services::ImportService;
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot all current data into the backup directory
    Create,

    /// List available backups, newest first
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Replace all data with a backup's contents
    Restore {
        /// Backup filename or path ('latest' for the most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete backups beyond the retention count
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> BackofficeResult<()> {
    let clock = SystemClock;
    let manager = BackupManager::new(storage.paths(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, pruned) = manager.create_backup_with_retention(storage, &clock)?;
            let filename = backup_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| backup_path.display().to_string());
            println!("Backup created: {}", filename);
            println!("Location: {}", backup_path.display());
            if !pruned.is_empty() {
                println!("Removed {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: backoffice backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = clock.now().signed_duration_since(backup.created_at);

                if verbose {
                    let contents = Snapshot::read_from(&backup.path)
                        .map(|s| s.counts().to_string())
                        .unwrap_or_else(|_| "unreadable".to_string());
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n   Contents: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        format_duration(age),
                        contents,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        format_duration(age),
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let snapshot = Snapshot::read_from(&backup_path)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", backup_path.display());
            if let Some(date) = snapshot.export_date {
                println!("Created: {}", date.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            println!("Contents: {}", snapshot.counts());
            println!();

            if !force {
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force flag:");
                println!("  backoffice backup restore {} --force", backup);
                return Ok(());
            }

            let result = ImportService::new(storage, settings)
                .import_snapshot(snapshot, &backup_path.display().to_string())?;

            if let Some(previous) = &result.backup {
                println!("Current data saved to: {}", previous.display());
            }
            println!("Restore complete: {}", result.counts);
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let keep = settings.backup_retention.keep as usize;
            let to_delete = backups.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!(
                    "Retention policy keeps {} backup(s); you have {}.",
                    keep,
                    backups.len()
                );
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Retention policy: keep {}", keep);
            println!("Current backups: {}", backups.len());
            println!("To be deleted: {}", to_delete);
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  backoffice backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> BackofficeResult<PathBuf> {
    let not_found = || BackofficeError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    };

    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(not_found);
    }

    let path = PathBuf::from(backup);
    if path.is_file() {
        return Ok(path);
    }

    if let Some(info) = manager.get_backup(backup)? {
        return Ok(info.path);
    }
    if let Some(info) = manager.get_backup(&format!("{}.json", backup))? {
        return Ok(info.path);
    }

    Err(not_found())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
