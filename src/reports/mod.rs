//! Reports
//!
//! Financial figures per period and the order dashboard.

pub mod dashboard;
pub mod finance;

pub use dashboard::{DashboardSummary, StatusCount};
pub use finance::{Aggregator, BalanceTrend, FinanceReport, PeriodSummary};
