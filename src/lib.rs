//! Backoffice - local back office for small service businesses
//!
//! This library keeps clients, service orders and supplier purchases in
//! local JSON files and derives the figures a shop owner looks at every day:
//! revenue, expenses and balance for the current month, the current year or
//! a chosen range, plus order counts by status.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `clock`: Injected time source for period calculations
//! - `models`: Core data models (clients, service orders, purchases, money)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `reports`: Finance figures and the dashboard
//! - `export`: JSON snapshots and Excel workbooks
//! - `audit`: Audit logging system
//! - `backup`: Snapshot backups with retention
//! - `display`, `cli`: Terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use backoffice::config::paths::BackofficePaths;
//! use backoffice::storage::Storage;
//! use backoffice::services::ClientService;
//!
//! let storage = Storage::open(BackofficePaths::new()?)?;
//! let clients = ClientService::new(&storage).list()?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BackofficeError, BackofficeResult};
