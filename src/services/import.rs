//! JSON import service
//!
//! Replaces every collection with the contents of a snapshot file. The file
//! is parsed completely before anything is touched; a broken file leaves the
//! current data as it was. Unless disabled in the settings, the current data
//! is backed up first.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::backup::BackupManager;
use crate::clock::{Clock, SystemClock};
use crate::config::settings::Settings;
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::Snapshot;
use crate::storage::{DatasetCounts, Storage};

/// Outcome of an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    /// Records now in storage
    pub counts: DatasetCounts,
    /// Backup of the replaced data, when one was taken
    pub backup: Option<PathBuf>,
    /// Service orders pointing at clients missing from the file
    pub orphaned_orders: usize,
}

/// Service for importing snapshot files
pub struct ImportService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
    clock: &'a dyn Clock,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self::with_clock(storage, settings, &SystemClock)
    }

    pub fn with_clock(storage: &'a Storage, settings: &'a Settings, clock: &'a dyn Clock) -> Self {
        Self {
            storage,
            settings,
            clock,
        }
    }

    /// Import a snapshot file, replacing all data
    pub fn import_file(&self, path: &Path) -> BackofficeResult<ImportResult> {
        let snapshot = Snapshot::read_from(path)?;
        self.import_snapshot(snapshot, &path.display().to_string())
    }

    /// Replace all data with an already-parsed snapshot
    pub fn import_snapshot(&self, snapshot: Snapshot, source: &str) -> BackofficeResult<ImportResult> {
        let orphaned_orders = count_orphaned_orders(&snapshot);
        if orphaned_orders > 0 {
            warn!(
                count = orphaned_orders,
                "imported service orders reference clients missing from the file"
            );
        }

        let backup = if self.settings.backup_before_import {
            let manager = BackupManager::new(self.storage.paths(), self.settings.backup_retention.clone());
            let (path, _) = manager.create_backup_with_retention(self.storage, self.clock)?;
            Some(path)
        } else {
            None
        };

        let counts = self
            .storage
            .bulk_replace(snapshot.clients, snapshot.service_orders, snapshot.purchases)
            .map_err(|e| match e {
                BackofficeError::Validation(msg) => {
                    BackofficeError::Import(format!("Invalid backup file: {}", msg))
                }
                other => other,
            })?;

        self.storage.log_import(source, counts);
        info!(%counts, source, "import finished");

        Ok(ImportResult {
            counts,
            backup,
            orphaned_orders,
        })
    }
}

fn count_orphaned_orders(snapshot: &Snapshot) -> usize {
    let client_ids: HashSet<_> = snapshot.clients.iter().map(|c| c.id).collect();
    snapshot
        .service_orders
        .iter()
        .filter(|o| !client_ids.contains(&o.client_id))
        .count()
}
