//! Backup manager
//!
//! Creates, lists and prunes snapshot backups.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::config::paths::BackofficePaths;
use crate::config::settings::BackupRetention;
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::Snapshot;
use crate::storage::write_json_atomic;
use crate::storage::Storage;

/// Metadata about a backup file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Taken from the file name
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: &BackofficePaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            retention,
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Snapshot current storage into a new backup file
    pub fn create_backup(&self, storage: &Storage, clock: &dyn Clock) -> BackofficeResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            BackofficeError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let snapshot = Snapshot::from_storage(storage, clock)?;
        let now = clock.now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let path = self.backup_dir.join(filename);

        write_json_atomic(&path, &snapshot)?;
        debug!(path = %path.display(), counts = %snapshot.counts(), "backup written");

        Ok(path)
    }

    /// Create a backup, then delete the ones beyond the retention count
    pub fn create_backup_with_retention(
        &self,
        storage: &Storage,
        clock: &dyn Clock,
    ) -> BackofficeResult<(PathBuf, Vec<PathBuf>)> {
        let path = self.create_backup(storage, clock)?;
        let deleted = self.enforce_retention()?;
        Ok((path, deleted))
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> BackofficeResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir).map_err(|e| {
            BackofficeError::Io(format!("Failed to read backup directory: {}", e))
        })?;

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                BackofficeError::Io(format!("Failed to read directory entry: {}", e))
            })?;
            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Delete all but the most recent backups
    pub fn enforce_retention(&self) -> BackofficeResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self
            .list_backups()?
            .into_iter()
            .skip(self.retention.keep as usize)
        {
            fs::remove_file(&backup.path).map_err(|e| {
                BackofficeError::Io(format!("Failed to delete old backup: {}", e))
            })?;
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Resolve a backup by file name
    pub fn get_backup(&self, filename: &str) -> BackofficeResult<Option<BackupInfo>> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }

    pub fn get_latest_backup(&self) -> BackofficeResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

/// Backup files are named backup-YYYYMMDD-HHMMSS-mmm.json
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let (seconds, millis) = match stamp.rsplit_once('-') {
        Some((head, tail)) if tail.len() == 3 && head.len() == 15 => (head, tail.parse().ok()?),
        _ => (stamp, 0),
    };
    let naive = NaiveDateTime::parse_from_str(seconds, "%Y%m%d-%H%M%S").ok()?;
    let naive = naive.checked_add_signed(chrono::Duration::milliseconds(millis))?;
    Some(Utc.from_utc_datetime(&naive))
}
