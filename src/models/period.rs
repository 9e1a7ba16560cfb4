//! Report periods and date windows
//!
//! A `DateWindow` is a closed range of calendar days. Membership is decided on
//! local wall-clock time with the start pinned to 00:00:00.000 and the end to
//! 23:59:59.999, so anything recorded during the last day still counts.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// A closed interval of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window; a start after the end gives an empty window
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether no instant can fall inside the window
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// The calendar month containing the given date
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month
            .map(|d| d - Duration::days(1))
            .unwrap_or(start);
        Self { start, end }
    }

    /// The calendar year containing the given date
    pub fn year_of(date: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
        let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// First instant of the window (00:00:00.000 on the start day)
    pub fn start_bound(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last instant of the window (23:59:59.999 on the end day)
    pub fn end_bound(&self) -> NaiveDateTime {
        let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        self.end.and_time(last_milli)
    }

    /// Whether a local date-time falls inside the window
    pub fn contains(&self, local: NaiveDateTime) -> bool {
        local >= self.start_bound() && local <= self.end_bound()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

/// Which window a figure is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportPeriod {
    /// The calendar month containing today
    Monthly,
    /// The calendar year containing today
    Annual,
    /// A caller-chosen range; both ends are needed for a window
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl ReportPeriod {
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Custom {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Resolve the window relative to today
    ///
    /// A custom period missing either boundary has no window.
    pub fn window(&self, today: NaiveDate) -> Option<DateWindow> {
        match self {
            Self::Monthly => Some(DateWindow::month_of(today)),
            Self::Annual => Some(DateWindow::year_of(today)),
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => Some(DateWindow::new(*start, *end)),
            Self::Custom { .. } => None,
        }
    }

    /// Parse a custom range: "2024-03" or "2024-03-01..2024-03-15"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        if let Some((start, end)) = s.split_once("..") {
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            return Ok(Self::custom(start, end));
        }

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;
        let window = DateWindow::month_of(first);
        Ok(Self::custom(window.start(), window.end()))
    }
}

/// Parse a date in ISO (2024-03-01) or Brazilian (01/03/2024) notation
pub fn parse_date(s: &str) -> Result<NaiveDate, PeriodParseError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(f, "Invalid date or period: {}", s),
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}
