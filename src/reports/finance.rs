//! Revenue, expenses and balance
//!
//! Revenue is the sum of service order values and expenses the sum of
//! purchase values whose local date falls inside a report window. Nothing is
//! cached: each figure rescans the collections, and "today" is read from the
//! clock on every call.

use std::fmt;

use crate::clock::Clock;
use crate::error::BackofficeResult;
use crate::models::{DateWindow, Money, ReportPeriod};
use crate::storage::Storage;

/// Sign of a balance, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceTrend {
    Positive,
    Negative,
    Zero,
}

impl BalanceTrend {
    pub fn of(balance: Money) -> Self {
        if balance.is_positive() {
            Self::Positive
        } else if balance.is_negative() {
            Self::Negative
        } else {
            Self::Zero
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "positivo",
            Self::Negative => "negativo",
            Self::Zero => "zerado",
        }
    }
}

impl fmt::Display for BalanceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Computes period figures from storage
pub struct Aggregator<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
}

impl<'a> Aggregator<'a> {
    pub fn new(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        Self { storage, clock }
    }

    /// The window a period covers today, if it has one
    pub fn window(&self, period: ReportPeriod) -> Option<DateWindow> {
        period.window(self.clock.today())
    }

    /// Sum of service order values in the period
    pub fn revenue(&self, period: ReportPeriod) -> BackofficeResult<Money> {
        match self.window(period) {
            Some(window) => self.revenue_in(&window),
            None => Ok(Money::zero()),
        }
    }

    /// Sum of purchase values in the period
    pub fn expenses(&self, period: ReportPeriod) -> BackofficeResult<Money> {
        match self.window(period) {
            Some(window) => self.expenses_in(&window),
            None => Ok(Money::zero()),
        }
    }

    /// Revenue minus expenses; may be negative
    pub fn balance(&self, period: ReportPeriod) -> BackofficeResult<Money> {
        Ok(self.revenue(period)? - self.expenses(period)?)
    }

    /// All figures for one period
    pub fn summarize(&self, period: ReportPeriod) -> BackofficeResult<PeriodSummary> {
        let window = self.window(period);
        let (revenue, expenses) = match &window {
            Some(w) => (self.revenue_in(w)?, self.expenses_in(w)?),
            None => (Money::zero(), Money::zero()),
        };
        let balance = revenue - expenses;

        Ok(PeriodSummary {
            period,
            window,
            revenue,
            expenses,
            balance,
            trend: BalanceTrend::of(balance),
        })
    }

    fn revenue_in(&self, window: &DateWindow) -> BackofficeResult<Money> {
        Ok(self
            .storage
            .service_orders
            .in_window(window, self.clock)?
            .iter()
            .map(|o| o.value)
            .sum())
    }

    fn expenses_in(&self, window: &DateWindow) -> BackofficeResult<Money> {
        Ok(self
            .storage
            .purchases
            .in_window(window, self.clock)?
            .iter()
            .map(|p| p.value)
            .sum())
    }
}

/// Revenue, expenses and balance over one period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSummary {
    pub period: ReportPeriod,
    /// None for a custom period missing a boundary
    pub window: Option<DateWindow>,
    pub revenue: Money,
    pub expenses: Money,
    pub balance: Money,
    pub trend: BalanceTrend,
}

impl PeriodSummary {
    pub fn title(&self) -> &'static str {
        match self.period {
            ReportPeriod::Monthly => "Mensal",
            ReportPeriod::Annual => "Anual",
            ReportPeriod::Custom { .. } => "Período",
        }
    }
}

/// Monthly, annual and optional custom figures side by side
#[derive(Debug, Clone)]
pub struct FinanceReport {
    pub monthly: PeriodSummary,
    pub annual: PeriodSummary,
    pub custom: Option<PeriodSummary>,
}

impl FinanceReport {
    /// Generate the report as of the clock's current date
    pub fn generate(
        storage: &Storage,
        clock: &dyn Clock,
        custom: Option<ReportPeriod>,
    ) -> BackofficeResult<Self> {
        let aggregator = Aggregator::new(storage, clock);

        Ok(Self {
            monthly: aggregator.summarize(ReportPeriod::Monthly)?,
            annual: aggregator.summarize(ReportPeriod::Annual)?,
            custom: custom.map(|p| aggregator.summarize(p)).transpose()?,
        })
    }

    fn summaries(&self) -> impl Iterator<Item = &PeriodSummary> {
        [&self.monthly, &self.annual]
            .into_iter()
            .chain(self.custom.as_ref())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Financeiro\n");
        output.push_str(&"=".repeat(70));
        output.push('\n');

        output.push_str(&format!(
            "{:<10} {:<25} {:>15} {:>15}\n",
            "Período", "Intervalo", "Faturamento", "Despesas"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for summary in self.summaries() {
            let window = summary
                .window
                .map(|w| w.to_string())
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:<10} {:<25} {:>15} {:>15}\n",
                summary.title(),
                window,
                summary.revenue,
                summary.expenses
            ));
        }

        output.push('\n');
        output.push_str("Balanço\n");
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for summary in self.summaries() {
            output.push_str(&format!(
                "{:<10} {:>15}  ({})\n",
                summary.title(),
                summary.balance,
                summary.trend
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
    use crate::models::{ClientDraft, PurchaseDraft, ServiceOrderDraft};
    use crate::services::{ClientService, PurchaseService, ServiceOrderService};
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn purchase(storage: &Storage, day: u32, cents: i64) {
        let at = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        PurchaseService::new(storage)
            .create(PurchaseDraft::new(at, "Atacado", Money::from_cents(cents)))
            .unwrap();
    }

    fn order(storage: &Storage, clock: &FixedClock, cents: i64) {
        let client = ClientService::with_clock(storage, clock)
            .create(ClientDraft::new("Maria", "12345678909"))
            .unwrap();
        ServiceOrderService::with_clock(storage, clock)
            .create(ServiceOrderDraft::new(client.id, "Notebook", Money::from_cents(cents)))
            .unwrap();
    }

    #[test]
    fn test_monthly_and_custom_expenses() {
        let (_temp, storage) = create_test_storage();
        purchase(&storage, 1, 10000);
        purchase(&storage, 31, 5000);

        let clock = FixedClock::at_date(date(2024, 3, 20));
        let aggregator = Aggregator::new(&storage, &clock);

        assert_eq!(
            aggregator.expenses(ReportPeriod::Monthly).unwrap(),
            Money::from_cents(15000)
        );
        assert_eq!(
            aggregator
                .expenses(ReportPeriod::custom(date(2024, 3, 1), date(2024, 3, 15)))
                .unwrap(),
            Money::from_cents(10000)
        );
    }

    #[test]
    fn test_month_follows_the_clock() {
        let (_temp, storage) = create_test_storage();
        purchase(&storage, 1, 10000);

        let april = FixedClock::at_date(date(2024, 4, 2));
        let aggregator = Aggregator::new(&storage, &april);
        assert_eq!(aggregator.expenses(ReportPeriod::Monthly).unwrap(), Money::zero());
        assert_eq!(
            aggregator.expenses(ReportPeriod::Annual).unwrap(),
            Money::from_cents(10000)
        );
    }

    #[test]
    fn test_balance_can_go_negative() {
        let (_temp, storage) = create_test_storage();
        let clock = FixedClock::at_date(date(2024, 3, 10));
        order(&storage, &clock, 4000);
        purchase(&storage, 5, 10000);

        let summary = Aggregator::new(&storage, &clock)
            .summarize(ReportPeriod::Monthly)
            .unwrap();
        assert_eq!(summary.revenue, Money::from_cents(4000));
        assert_eq!(summary.expenses, Money::from_cents(10000));
        assert_eq!(summary.balance, Money::from_cents(-6000));
        assert_eq!(summary.trend, BalanceTrend::Negative);
    }

    #[test]
    fn test_custom_period_without_end_is_zero() {
        let (_temp, storage) = create_test_storage();
        let clock = FixedClock::at_date(date(2024, 3, 10));
        order(&storage, &clock, 4000);
        purchase(&storage, 5, 1000);

        let partial = ReportPeriod::Custom {
            start: Some(date(2024, 3, 1)),
            end: None,
        };
        let summary = Aggregator::new(&storage, &clock).summarize(partial).unwrap();
        assert_eq!(summary.window, None);
        assert_eq!(summary.revenue, Money::zero());
        assert_eq!(summary.expenses, Money::zero());
        assert_eq!(summary.trend, BalanceTrend::Zero);
    }

    #[test]
    fn test_window_edges_to_the_millisecond() {
        let (_temp, storage) = create_test_storage();
        let service = PurchaseService::new(&storage);
        let edges = [
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap() + chrono::Duration::milliseconds(999),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap() + chrono::Duration::milliseconds(999),
            Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap(),
        ];
        for (i, at) in edges.into_iter().enumerate() {
            let cents = 10_i64.pow(i as u32);
            service
                .create(PurchaseDraft::new(at, "Atacado", Money::from_cents(cents)))
                .unwrap();
        }

        let clock = FixedClock::at_date(date(2024, 3, 20));
        let expenses = Aggregator::new(&storage, &clock)
            .expenses(ReportPeriod::custom(date(2024, 3, 1), date(2024, 3, 15)))
            .unwrap();
        assert_eq!(expenses, Money::from_cents(11));
    }

    #[test]
    fn test_revenue_window_edges_to_the_millisecond() {
        let (_temp, storage) = create_test_storage();
        let setup = FixedClock::at_date(date(2024, 3, 1));
        let client = ClientService::with_clock(&storage, &setup)
            .create(ClientDraft::new("Maria", "12345678909"))
            .unwrap();

        let edges = [
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap() + chrono::Duration::milliseconds(999),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap() + chrono::Duration::milliseconds(999),
            Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap(),
        ];
        for (i, at) in edges.into_iter().enumerate() {
            let cents = 10_i64.pow(i as u32);
            ServiceOrderService::with_clock(&storage, &FixedClock::utc(at))
                .create(ServiceOrderDraft::new(client.id, "Notebook", Money::from_cents(cents)))
                .unwrap();
        }

        let clock = FixedClock::at_date(date(2024, 3, 20));
        let revenue = Aggregator::new(&storage, &clock)
            .revenue(ReportPeriod::custom(date(2024, 3, 1), date(2024, 3, 15)))
            .unwrap();
        assert_eq!(revenue, Money::from_cents(11));
    }

    #[test]
    fn test_reversed_custom_range_is_zero() {
        let (_temp, storage) = create_test_storage();
        let clock = FixedClock::at_date(date(2024, 3, 5));
        order(&storage, &clock, 4000);
        purchase(&storage, 5, 10000);

        let summary = Aggregator::new(&storage, &clock)
            .summarize(ReportPeriod::custom(date(2024, 3, 15), date(2024, 3, 1)))
            .unwrap();
        assert_eq!(summary.revenue, Money::zero());
        assert_eq!(summary.expenses, Money::zero());
        assert_eq!(summary.trend, BalanceTrend::Zero);
    }

    #[test]
    fn test_figures_are_recomputed_on_every_call() {
        let (_temp, storage) = create_test_storage();
        let clock = FixedClock::at_date(date(2024, 3, 20));
        let aggregator = Aggregator::new(&storage, &clock);

        assert_eq!(aggregator.expenses(ReportPeriod::Monthly).unwrap(), Money::zero());
        purchase(&storage, 2, 700);
        assert_eq!(
            aggregator.expenses(ReportPeriod::Monthly).unwrap(),
            Money::from_cents(700)
        );
    }

    #[test]
    fn test_report_format() {
        let (_temp, storage) = create_test_storage();
        let clock = FixedClock::at_date(date(2024, 3, 10));
        order(&storage, &clock, 123456);

        let report = FinanceReport::generate(
            &storage,
            &clock,
            Some(ReportPeriod::custom(date(2024, 3, 1), date(2024, 3, 15))),
        )
        .unwrap();
        assert!(report.custom.is_some());
        assert_eq!(report.annual.revenue, Money::from_cents(123456));

        let output = report.format_terminal();
        assert!(output.contains("Financeiro"));
        assert!(output.contains("01/03/2024 - 15/03/2024"));
        assert!(output.contains("R$ 1.234,56"));
        assert!(output.contains("positivo"));
    }
}
