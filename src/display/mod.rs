//! Display formatting for terminal output
//!
//! Tables and detail views for clients, service orders and purchases. Dates
//! are shown in the local timezone as `dd/mm/yyyy`, amounts as `R$ 1.234,56`.

pub mod client;
pub mod purchase;
pub mod service_order;

pub use client::{format_client_details, format_client_list};
pub use purchase::{format_purchase_details, format_purchase_list};
pub use service_order::{format_service_order_details, format_service_order_list};

use chrono::{DateTime, Utc};

use crate::clock::Clock;

/// Local calendar date of an instant, `dd/mm/yyyy`
pub fn format_date(clock: &dyn Clock, instant: DateTime<Utc>) -> String {
    clock.to_local(instant).format("%d/%m/%Y").to_string()
}

/// Local date and time of an instant, `dd/mm/yyyy HH:MM`
pub fn format_date_time(clock: &dyn Clock, instant: DateTime<Utc>) -> String {
    clock.to_local(instant).format("%d/%m/%Y %H:%M").to_string()
}

/// Shorten to at most `max` characters, ending in "..." when cut
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Widest value in a column, in characters, never narrower than the header
pub(crate) fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>, max: usize) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
        .min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Maria", 10), "Maria");
        assert_eq!(truncate("João da Silva Pereira", 10), "João da...");
    }

    #[test]
    fn test_dates_are_local() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 2, 1, 30, 0).unwrap();
        let clock = FixedClock::with_offset(instant, FixedOffset::west_opt(3 * 3600).unwrap());
        assert_eq!(format_date(&clock, instant), "01/03/2024");
        assert_eq!(format_date_time(&clock, instant), "01/03/2024 22:30");
    }

    #[test]
    fn test_column_width() {
        let names = ["Ana", "Maria José"];
        assert_eq!(column_width("Nome", names.iter().copied(), 40), 10);
        assert_eq!(column_width("Nome", names.iter().copied(), 5), 5);
        assert_eq!(column_width("Nome", std::iter::empty(), 40), 4);
    }
}
