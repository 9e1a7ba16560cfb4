//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod backup;
pub mod client;
pub mod export;
pub mod import;
pub mod order;
pub mod purchase;
pub mod report;

pub use audit::handle_audit_command;
pub use backup::{handle_backup_command, BackupCommands};
pub use client::{handle_client_command, ClientCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::handle_import_command;
pub use order::{handle_order_command, OrderCommands};
pub use purchase::{handle_purchase_command, PurchaseCommands};
pub use report::{handle_dashboard_command, handle_report_command, ReportArgs};
