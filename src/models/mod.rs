//! Core data models
//!
//! Clients, service orders and purchases, plus the value types they are
//! built from: identifiers, money, tax documents and report periods.

pub mod client;
pub mod document;
pub mod ids;
pub mod money;
pub mod period;
pub mod purchase;
pub mod service_order;

pub use client::{Client, ClientDraft, ClientPatch};
pub use document::DocumentKind;
pub use ids::{ClientId, PurchaseId, RecordId, ServiceOrderId};
pub use money::Money;
pub use period::{DateWindow, ReportPeriod};
pub use purchase::{Purchase, PurchaseDraft, PurchasePatch};
pub use service_order::{OrderStatus, Priority, ServiceOrder, ServiceOrderDraft, ServiceOrderPatch};
