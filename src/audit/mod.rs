//! Audit logging
//!
//! Every create, update and delete, and every import, is appended to an
//! append-only JSON-lines file with the record's before/after values.
//!
//! - `AuditEntry`: one log line.
//! - `AuditLogger`: appends entries to `audit.log` and reads them back.
//! - `generate_diff`: top-level field changes between two record states.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
