//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure. Writes
//! are split into a staging step (serialize into a sibling temp file) and a
//! commit step (rename over the target) so that several files can be staged
//! before any of them replaces live data.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

use crate::error::BackofficeError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, BackofficeError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        BackofficeError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        BackofficeError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// A serialized file waiting to be renamed over its target
#[derive(Debug)]
#[must_use = "a staged file does nothing until committed"]
pub struct StagedFile {
    temp_path: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    /// Rename the staged file over its target
    pub fn commit(self) -> Result<(), BackofficeError> {
        fs::rename(&self.temp_path, &self.target).map_err(|e| {
            // Try to clean up temp file if rename fails
            let _ = fs::remove_file(&self.temp_path);
            BackofficeError::Storage(format!(
                "Failed to replace {}: {}",
                self.target.display(),
                e
            ))
        })
    }

    /// Throw the staged file away
    pub fn discard(self) {
        let _ = fs::remove_file(&self.temp_path);
    }
}

/// Serialize data into a temp file next to `path`, synced to disk
pub fn stage_json<T, P>(path: P, data: &T) -> Result<StagedFile, BackofficeError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BackofficeError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| BackofficeError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| BackofficeError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| BackofficeError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| BackofficeError::Storage(format!("Failed to sync data: {}", e)))?;

    Ok(StagedFile {
        temp_path,
        target: path.to_path_buf(),
    })
}

/// Commit several staged files as one unit
///
/// Every live target is copied aside before anything is renamed. If a
/// rename fails, targets already replaced are put back from their copies
/// and the remaining staged files are discarded, so either all targets
/// change or none do.
pub fn commit_all(files: Vec<StagedFile>) -> Result<(), BackofficeError> {
    let mut saved = Vec::with_capacity(files.len());
    let mut failure = None;
    for file in &files {
        match SavedCopy::take(&file.target) {
            Ok(copy) => saved.push(copy),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    if let Some(e) = failure {
        saved.iter().for_each(SavedCopy::remove);
        files.into_iter().for_each(StagedFile::discard);
        return Err(e);
    }

    let mut pending = files.into_iter();
    let mut committed = 0;
    while let Some(file) = pending.next() {
        if let Err(e) = file.commit() {
            pending.by_ref().for_each(StagedFile::discard);
            saved[..committed].iter().for_each(SavedCopy::restore);
            saved[committed..].iter().for_each(SavedCopy::remove);
            return Err(e);
        }
        committed += 1;
    }

    saved.iter().for_each(SavedCopy::remove);
    Ok(())
}

/// Copy of a live file taken before it is replaced
struct SavedCopy {
    target: PathBuf,
    copy: Option<PathBuf>,
}

impl SavedCopy {
    fn take(target: &Path) -> Result<Self, BackofficeError> {
        if !target.exists() {
            return Ok(Self {
                target: target.to_path_buf(),
                copy: None,
            });
        }

        let copy = target.with_extension("json.bak");
        fs::copy(target, &copy).map_err(|e| {
            BackofficeError::Storage(format!("Failed to save {}: {}", target.display(), e))
        })?;
        Ok(Self {
            target: target.to_path_buf(),
            copy: Some(copy),
        })
    }

    /// Put the target back as it was
    fn restore(&self) {
        let result = match &self.copy {
            Some(copy) => fs::rename(copy, &self.target),
            None => fs::remove_file(&self.target),
        };
        if let Err(e) = result {
            error!(path = %self.target.display(), error = %e, "failed to restore file");
        }
    }

    fn remove(&self) {
        if let Some(copy) = &self.copy {
            let _ = fs::remove_file(copy);
        }
    }
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BackofficeError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    stage_json(path, data)?.commit()
}
