//! Path management
//!
//! Resolves the base directory from `BACKOFFICE_HOME` or the platform's
//! standard data location, and derives every file the application touches.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BackofficeError;

/// Environment variable overriding the base directory
pub const HOME_ENV: &str = "BACKOFFICE_HOME";

/// All filesystem locations used by the application
#[derive(Debug, Clone)]
pub struct BackofficePaths {
    base_dir: PathBuf,
}

impl BackofficePaths {
    /// Resolve paths from the environment or the platform data directory
    pub fn new() -> Result<Self, BackofficeError> {
        if let Ok(home) = std::env::var(HOME_ENV) {
            if !home.trim().is_empty() {
                return Ok(Self::with_base_dir(PathBuf::from(home)));
            }
        }

        let dirs = ProjectDirs::from("", "", "backoffice").ok_or_else(|| {
            BackofficeError::Config("Could not determine a home directory".into())
        })?;

        Ok(Self::with_base_dir(dirs.data_dir().to_path_buf()))
    }

    /// Use an explicit base directory (tests, portable installs)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn clients_file(&self) -> PathBuf {
        self.data_dir().join("clients.json")
    }

    pub fn service_orders_file(&self) -> PathBuf {
        self.data_dir().join("service_orders.json")
    }

    pub fn purchases_file(&self) -> PathBuf {
        self.data_dir().join("purchases.json")
    }

    /// Create the data and backup directories if missing
    pub fn ensure_directories(&self) -> Result<(), BackofficeError> {
        for dir in [self.data_dir(), self.backup_dir()] {
            fs::create_dir_all(&dir).map_err(|e| {
                BackofficeError::Io(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}
