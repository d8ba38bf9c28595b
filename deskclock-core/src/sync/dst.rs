//! Daylight Saving Time Rules
//!
//! Transitions follow the nth-weekday rules:
//!
//! | Region | Starts                         | Ends                          |
//! |--------|--------------------------------|-------------------------------|
//! | EU     | last Sunday of March, 01:00    | last Sunday of October, 02:00 |
//! | NA     | second Sunday of March, 02:00  | first Sunday of November, 02:00 |
//!
//! "Last Sunday of month M" is the first Sunday of month M+1 minus seven
//! days. Instants are compared against the UTC timestamp from the network,
//! so the switch happens at the listed hour on the UTC timeline.

use chrono::{Datelike, Days, NaiveDate};

use crate::constants::time::SECONDS_PER_HOUR;

/// Region whose rule decides the transition dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstRegion {
    /// European Union
    Eu,
    /// United States and Canada
    Na,
}

/// Stored DST setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstMode {
    /// Standard time all year
    Off,
    /// Summer time all year
    On,
    /// European rule
    #[default]
    AutoEu,
    /// North American rule
    AutoNa,
}

impl DstMode {
    /// All modes in settings-page order
    pub const ALL: [DstMode; 4] = [DstMode::Off, DstMode::On, DstMode::AutoEu, DstMode::AutoNa];

    /// Identifier stored in the settings
    pub const fn name(self) -> &'static str {
        match self {
            DstMode::Off => "dst_off",
            DstMode::On => "dst_on",
            DstMode::AutoEu => "auto_eu",
            DstMode::AutoNa => "auto_na",
        }
    }

    /// Human-readable name
    pub const fn label(self) -> &'static str {
        match self {
            DstMode::Off => "DST Off",
            DstMode::On => "DST On",
            DstMode::AutoEu => "Auto EU",
            DstMode::AutoNa => "Auto NA",
        }
    }

    /// Parse a stored identifier
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }

    /// Region for the automatic modes
    pub const fn region(self) -> Option<DstRegion> {
        match self {
            DstMode::AutoEu => Some(DstRegion::Eu),
            DstMode::AutoNa => Some(DstRegion::Na),
            DstMode::Off | DstMode::On => None,
        }
    }
}

/// Start and end of summer time in one year, as UTC timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstTransitions {
    /// Calendar year
    pub year: i32,
    /// First second of summer time
    pub start: i64,
    /// First second back on standard time
    pub end: i64,
}

impl DstTransitions {
    /// Compute the transitions of `region` in `year`
    pub fn for_year(region: DstRegion, year: i32) -> Option<Self> {
        let (start, end) = match region {
            DstRegion::Eu => (
                at_hour(last_sunday(year, 3)?, 1)?,
                at_hour(last_sunday(year, 10)?, 2)?,
            ),
            DstRegion::Na => (
                at_hour(nth_sunday(year, 3, 2)?, 2)?,
                at_hour(nth_sunday(year, 11, 1)?, 2)?,
            ),
        };
        Some(Self { year, start, end })
    }

    /// Whether `utc` falls inside summer time
    pub fn contains(&self, utc: i64) -> bool {
        utc >= self.start && utc < self.end
    }
}

/// Whether summer time applies at `utc` under `region`'s rule
pub fn is_dst(utc: i64, region: DstRegion) -> bool {
    year_of(utc)
        .and_then(|year| DstTransitions::for_year(region, year))
        .is_some_and(|t| t.contains(utc))
}

/// Calendar year of a UTC timestamp
pub(crate) fn year_of(utc: i64) -> Option<i32> {
    chrono::DateTime::from_timestamp(utc, 0).map(|dt| dt.year())
}

/// `n`th Sunday (1-based) of `month`
pub fn nth_sunday(year: i32, month: u32, n: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let to_sunday = (7 - first.weekday().num_days_from_sunday()) % 7;
    first.checked_add_days(Days::new(u64::from(to_sunday + 7 * n.checked_sub(1)?)))
}

/// Last Sunday of `month`: first Sunday of the next month minus a week
pub fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    nth_sunday(next_year, next_month, 1)?.checked_sub_days(Days::new(7))
}

fn at_hour(date: NaiveDate, hour: u32) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
    Some(midnight + i64::from(hour) * SECONDS_PER_HOUR)
}
