//! Report CLI commands
//!
//! `report` prints the monthly and annual figures, plus a custom range when
//! one is given. `dashboard` prints order counts and the latest orders.

use clap::Args;

use crate::clock::SystemClock;
use crate::config::settings::Settings;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::period::parse_date;
use crate::models::ReportPeriod;
use crate::reports::{DashboardSummary, FinanceReport};
use crate::storage::Storage;

/// Arguments for the finance report
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Start of a custom range (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub from: Option<String>,
    /// End of a custom range
    #[arg(long)]
    pub to: Option<String>,
    /// A custom range as "2024-03" or "2024-03-01..2024-03-15"
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub period: Option<String>,
}

impl ReportArgs {
    /// The custom period requested, if any
    ///
    /// Giving only one of `--from`/`--to` yields a period without a window,
    /// which reports zero.
    pub fn custom_period(&self) -> BackofficeResult<Option<ReportPeriod>> {
        if let Some(period) = &self.period {
            return ReportPeriod::parse(period)
                .map(Some)
                .map_err(|e| BackofficeError::Validation(e.to_string()));
        }

        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }

        let parse = |s: &Option<String>| {
            s.as_deref()
                .map(parse_date)
                .transpose()
                .map_err(|e| BackofficeError::Validation(e.to_string()))
        };

        Ok(Some(ReportPeriod::Custom {
            start: parse(&self.from)?,
            end: parse(&self.to)?,
        }))
    }
}

/// Handle the `report` command
pub fn handle_report_command(storage: &Storage, args: ReportArgs) -> BackofficeResult<()> {
    let report = FinanceReport::generate(storage, &SystemClock, args.custom_period()?)?;
    print!("{}", report.format_terminal());
    Ok(())
}

/// Handle the `dashboard` command
pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    limit: Option<usize>,
) -> BackofficeResult<()> {
    let limit = limit.unwrap_or(settings.recent_orders_limit);
    let summary = DashboardSummary::generate(storage, &SystemClock, limit)?;
    print!("{}", summary.format_terminal(&SystemClock));
    Ok(())
}
