//! Time types for the clock core
//!
//! Two notions of time meet in a desk clock:
//! - **Monotonic milliseconds** ([`Timestamp`]) from a free-running timer,
//!   used for debouncing, sync freshness and edit-screen timeouts
//! - **Wall-clock fields** ([`WallClock`]) as kept by the RTC chip, used for
//!   the display and the alarm
//!
//! Calendar arithmetic (Unix seconds to fields and back, weekdays) goes
//! through `chrono` with default features off, so it works without `std`.

use core::cell::Cell;

use chrono::{DateTime, Datelike, NaiveDate, Timelike};

use crate::traits::TimeSource;

/// Monotonic timestamp in milliseconds since boot
pub type Timestamp = u64;

/// Abbreviated weekday names, Monday first
pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Abbreviated month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Hour, minute and second of the local day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOfDay {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

impl TimeOfDay {
    /// Create from raw fields
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self { hour, minute, second }
    }
}

/// Calendar fields as stored in the RTC chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    /// Full year, e.g. 2024
    pub year: u16,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

impl WallClock {
    /// Build from calendar fields, rejecting impossible dates
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        NaiveDate::from_ymd_opt(year.into(), month.into(), day.into())?
            .and_hms_opt(hour.into(), minute.into(), second.into())?;
        Some(Self { year, month, day, hour, minute, second })
    }

    /// Fields of a Unix timestamp, read on the UTC timeline
    ///
    /// The caller applies any zone offset to `secs` beforehand.
    pub fn from_unix(secs: i64) -> Option<Self> {
        let dt = DateTime::from_timestamp(secs, 0)?.naive_utc();
        let year = u16::try_from(dt.year()).ok()?;
        Some(Self {
            year,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
        })
    }

    /// Seconds since the Unix epoch, treating the fields as UTC
    pub fn to_unix(&self) -> Option<i64> {
        let dt = NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?
            .and_hms_opt(self.hour.into(), self.minute.into(), self.second.into())?;
        Some(dt.and_utc().timestamp())
    }

    /// Day of week, 0 = Monday
    pub fn weekday(&self) -> Option<u8> {
        let date = NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?;
        Some(date.weekday().num_days_from_monday() as u8)
    }

    /// Time-of-day part
    pub const fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::new(self.hour, self.minute, self.second)
    }
}

/// Manually driven time source
///
/// Interior mutability lets a test advance the clock while the core holds a
/// shared reference to it.
#[derive(Debug, Default)]
pub struct FixedTime {
    now: Cell<Timestamp>,
}

impl FixedTime {
    /// Start at `timestamp`
    pub const fn new(timestamp: Timestamp) -> Self {
        Self { now: Cell::new(timestamp) }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.now.set(timestamp);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);
    }

    #[test]
    fn unix_epoch_fields() {
        let wc = WallClock::from_unix(0).unwrap();
        assert_eq!((wc.year, wc.month, wc.day), (1970, 1, 1));
        assert_eq!(wc.time_of_day(), TimeOfDay::new(0, 0, 0));
        assert_eq!(wc.weekday(), Some(3)); // Thursday
    }

    #[test]
    fn fields_match_known_instant() {
        // 2024-01-15 06:30:00 UTC, a Monday
        let wc = WallClock::from_unix(1_705_300_200).unwrap();
        assert_eq!(wc, WallClock::new(2024, 1, 15, 6, 30, 0).unwrap());
        assert_eq!(wc.weekday(), Some(0));
        assert_eq!(wc.to_unix(), Some(1_705_300_200));
    }

    #[test]
    fn leap_day_survives_conversion() {
        let wc = WallClock::new(2024, 2, 29, 23, 59, 59).unwrap();
        let secs = wc.to_unix().unwrap();
        assert_eq!(WallClock::from_unix(secs), Some(wc));
    }

    #[test]
    fn impossible_dates_rejected() {
        assert!(WallClock::new(2023, 2, 29, 0, 0, 0).is_none());
        assert!(WallClock::new(2024, 13, 1, 0, 0, 0).is_none());
        assert!(WallClock::new(2024, 1, 1, 24, 0, 0).is_none());
    }
}
