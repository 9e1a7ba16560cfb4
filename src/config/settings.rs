//! User settings
//!
//! Persisted as `config.json` in the base directory.

use serde::{Deserialize, Serialize};

use crate::error::BackofficeError;
use crate::storage::file_io::{read_json, write_json_atomic};

use super::paths::BackofficePaths;

/// How many backups to keep around
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of most recent backups kept by `prune`
    pub keep: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { keep: 10 }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Snapshot the current data before an import replaces it
    pub backup_before_import: bool,

    /// Backup retention policy
    pub backup_retention: BackupRetention,

    /// How many orders the dashboard lists as recent
    pub recent_orders_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_before_import: true,
            backup_retention: BackupRetention::default(),
            recent_orders_limit: 5,
        }
    }
}

impl Settings {
    /// Load settings, writing the defaults on first run
    pub fn load_or_create(paths: &BackofficePaths) -> Result<Self, BackofficeError> {
        let path = paths.settings_file();
        if path.exists() {
            return read_json(&path)
                .map_err(|e| BackofficeError::Config(format!("Invalid settings: {}", e)));
        }

        let settings = Self::default();
        settings.save(paths)?;
        Ok(settings)
    }

    /// Persist settings
    pub fn save(&self, paths: &BackofficePaths) -> Result<(), BackofficeError> {
        write_json_atomic(paths.settings_file(), self)
    }
}
