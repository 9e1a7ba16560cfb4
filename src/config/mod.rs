//! Configuration and path management
//!
//! - `paths`: where data, backups, settings and the audit log live
//! - `settings`: user-adjustable behaviour persisted as JSON

pub mod paths;
pub mod settings;

pub use paths::BackofficePaths;
pub use settings::Settings;
