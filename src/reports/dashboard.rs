//! Dashboard summary
//!
//! Order counts by status and the most recent orders.

use crate::clock::Clock;
use crate::display::{format_date, truncate};
use crate::error::BackofficeResult;
use crate::models::{OrderStatus, ServiceOrder};
use crate::services::ServiceOrderService;
use crate::storage::Storage;

/// Number of orders in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// Snapshot of the order workload
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// One entry per status, in workflow order
    pub by_status: Vec<StatusCount>,
    pub total: usize,
    /// Newest first, with current client names
    pub recent: Vec<ServiceOrder>,
}

impl DashboardSummary {
    pub fn generate(
        storage: &Storage,
        clock: &dyn Clock,
        recent_limit: usize,
    ) -> BackofficeResult<Self> {
        let orders = ServiceOrderService::with_clock(storage, clock).list()?;

        let by_status = OrderStatus::all()
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: orders.iter().filter(|o| o.status == status).count(),
            })
            .collect();

        let total = orders.len();
        let recent = orders.into_iter().take(recent_limit).collect();

        Ok(Self {
            by_status,
            total,
            recent,
        })
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    }

    /// Format the dashboard for terminal display
    pub fn format_terminal(&self, clock: &dyn Clock) -> String {
        let mut output = String::new();

        output.push_str("Dashboard\n");
        output.push_str(&"=".repeat(70));
        output.push('\n');

        for entry in &self.by_status {
            output.push_str(&format!("{:<15} {:>6}\n", entry.status, entry.count));
        }
        output.push_str(&"-".repeat(22));
        output.push('\n');
        output.push_str(&format!("{:<15} {:>6}\n", "Total", self.total));
        output.push('\n');

        output.push_str("Ordens Recentes\n");
        output.push_str(&"-".repeat(70));
        output.push('\n');

        if self.recent.is_empty() {
            output.push_str("Nenhuma ordem de serviço cadastrada.\n");
            return output;
        }

        for order in &self.recent {
            output.push_str(&format!(
                "#{:<6} {:<10} {:<22} {:<15} {:>13}\n",
                order.order_number,
                format_date(clock, order.date),
                truncate(&order.client_name, 22),
                order.status,
                order.value
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::paths::BackofficePaths;
    use crate::models::{ClientDraft, Money, ServiceOrderDraft};
    use crate::services::ClientService;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_counts_and_recent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let client = ClientService::with_clock(&storage, &FixedClock::utc(start))
            .create(ClientDraft::new("Maria", "12345678909"))
            .unwrap();

        let statuses = [
            OrderStatus::Pending,
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Completed,
            OrderStatus::Pending,
            OrderStatus::Cancelled,
            OrderStatus::Completed,
        ];
        for (day, status) in statuses.into_iter().enumerate() {
            let clock = FixedClock::utc(start + Duration::days(day as i64));
            let mut draft = ServiceOrderDraft::new(client.id, "Notebook", Money::from_cents(1000));
            draft.status = status;
            ServiceOrderService::with_clock(&storage, &clock)
                .create(draft)
                .unwrap();
        }

        let clock = FixedClock::utc(start);
        let summary = DashboardSummary::generate(&storage, &clock, 5).unwrap();
        assert_eq!(summary.total, 7);
        assert_eq!(summary.count(OrderStatus::Pending), 3);
        assert_eq!(summary.count(OrderStatus::InProgress), 1);
        assert_eq!(summary.count(OrderStatus::Completed), 2);
        assert_eq!(summary.count(OrderStatus::Cancelled), 1);

        assert_eq!(summary.recent.len(), 5);
        assert_eq!(summary.recent[0].order_number, 7);
        assert_eq!(summary.recent[4].order_number, 3);

        let output = summary.format_terminal(&clock);
        assert!(output.contains("Em Andamento"));
        assert!(output.contains("07/03/2024"));
    }

    #[test]
    fn test_empty_dashboard() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        let clock = FixedClock::utc(Utc::now());

        let summary = DashboardSummary::generate(&storage, &clock, 5).unwrap();
        assert_eq!(summary.total, 0);
        assert!(summary.format_terminal(&clock).contains("Nenhuma ordem"));
    }
}
