//! Time source
//!
//! Monthly and annual figures depend on "now", and window membership is
//! decided in local time. Both go through a `Clock` so that reports can be
//! computed against a fixed instant and timezone.

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};

/// Source of the current instant and of the local timezone
pub trait Clock {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time of an instant in the local timezone
    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime;

    /// The instant at which a local wall-clock time occurs
    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc>;

    /// Today's date in the local timezone
    fn today(&self) -> NaiveDate {
        self.to_local(self.now()).date()
    }
}

/// The machine's clock and timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&Local).naive_local()
    }

    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        // Gaps from DST transitions fall back to reading the time as UTC
        Local
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&local))
    }
}

/// A clock frozen at one instant in a fixed-offset timezone
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Frozen clock whose local time is UTC
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, Utc.fix())
    }

    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Frozen clock at local noon of the given date, UTC timezone
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date.and_time(NaiveTime::MIN + Duration::hours(12));
        Self::utc(Utc.from_utc_datetime(&noon))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        self.offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&local))
    }
}
