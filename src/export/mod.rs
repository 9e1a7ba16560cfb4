//! Bulk export
//!
//! - JSON: the full data set as a snapshot document, re-importable.
//! - Spreadsheet: one `.xlsx` workbook with a localized sheet per entity
//!   type, for people to read.

pub mod json;
pub mod spreadsheet;

pub use json::{default_json_file_name, export_json, Snapshot};
pub use spreadsheet::{export_sheet, export_workbook, Sheet, SheetTable, DEFAULT_WORKBOOK_NAME};
