//! Backups
//!
//! A backup is a JSON snapshot of the full data set (the same document
//! `export json` writes), stored under `backups/` with a timestamped name.
//! One is taken automatically before every import unless disabled in the
//! settings. Restoring a backup is an ordinary import of that file.
//!
//! Retention keeps the N most recent backups; older ones are deleted by
//! `prune` and after every new backup.

mod manager;

pub use manager::{BackupInfo, BackupManager};
