//! Storage initialization
//!
//! First-run setup: directories, default settings and empty collection files.

use crate::config::paths::BackofficePaths;
use crate::config::settings::Settings;
use crate::error::BackofficeError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left alone, so running this twice is harmless. Returns
/// whether anything was created.
pub fn initialize_storage(paths: &BackofficePaths) -> Result<bool, BackofficeError> {
    paths.ensure_directories()?;

    let mut created = false;
    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
        created = true;
    }

    let empty = serde_json::json!({ "next_id": 1, "records": [] });
    for file in [
        paths.clients_file(),
        paths.service_orders_file(),
        paths.purchases_file(),
    ] {
        if !file.exists() {
            write_json_atomic(&file, &empty)?;
            created = true;
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_files_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());
        assert!(paths.settings_file().exists());
        assert!(paths.clients_file().exists());
        assert!(paths.purchases_file().exists());

        assert!(!initialize_storage(&paths).unwrap());
    }
}
