//! Service layer
//!
//! Business rules on top of the storage layer: validation, derived fields,
//! referential checks and the audit trail for every mutation.

pub mod client;
pub mod import;
pub mod purchase;
pub mod service_order;

pub use client::ClientService;
pub use import::{ImportResult, ImportService};
pub use purchase::PurchaseService;
pub use service_order::ServiceOrderService;
