//! Constants for the Clock Control Core
//!
//! Centralized, documented tuning values. Grouped by concern:
//! - **Time**: sync interval, retry budget, adjust-loop timing
//! - **Input**: debounce and long-press defaults
//! - **Alarm**: ring cadence
//! - **Display**: slot layout and text sizes
//!
//! Always use these instead of magic numbers; durations carry their unit in
//! the type (`fugit`), plain integers carry it in the name.

/// Intervals, retry budgets and conversions.
pub mod time;

/// Button debounce defaults.
pub mod input;

/// Alarm ring cadence.
pub mod alarm;

/// Display layout.
pub mod display;

pub use alarm::{ALARM_TONE_HIGH_HZ, ALARM_TONE_LOW_HZ, ALARM_TONE_MS, ALARM_TONE_REPEATS};
pub use display::{AUX_TEXT_SLOT, DIGIT_SLOTS, MAX_TEXT_LEN};
pub use input::{DEFAULT_DEBOUNCE, DEFAULT_LONG_PRESS, MAX_BUTTONS};
pub use time::{
    ADJUST_POLL_INTERVAL, ADJUST_TIMEOUT, DEFAULT_SYNC_INTERVAL, SYNC_MAX_RETRIES,
    SYNC_RETRY_DELAY,
};
