//! Time-Related Constants
//!
//! Intervals, retry budgets and unit conversions used by the sync manager,
//! the modal adjust loop and the main service loop.

use fugit::{MillisDurationU32, SecsDurationU32};

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: i64 = 3600;

// ===== TIME SYNCHRONIZATION =====

/// Default interval between network time syncs.
///
/// The RTC oscillator drifts a few seconds a month, so an hourly sync keeps
/// the displayed minute exact while leaving the network idle most of the time.
pub const DEFAULT_SYNC_INTERVAL: SecsDurationU32 = SecsDurationU32::secs(3600);

/// Retries after the first failed time request.
///
/// Three requests in total before the sync is deferred to the next interval.
pub const SYNC_MAX_RETRIES: u8 = 2;

/// Pause between time requests.
pub const SYNC_RETRY_DELAY: MillisDurationU32 = MillisDurationU32::millis(2000);

/// Offset of local standard time from UTC is limited to whole hours in this range.
pub const UTC_OFFSET_MIN_HOURS: i8 = -12;

/// See [`UTC_OFFSET_MIN_HOURS`].
pub const UTC_OFFSET_MAX_HOURS: i8 = 12;

/// Shift applied while daylight saving time is in effect.
pub const DST_SHIFT_SECONDS: i64 = SECONDS_PER_HOUR;

// ===== RTC ACCESS =====

/// Reads of a busy RTC bus attempted within one tick before the tick is skipped.
pub const RTC_READ_RETRIES: u8 = 3;

// ===== MODAL ADJUST LOOP =====

/// Idle time after which an edit screen returns to the time display.
pub const ADJUST_TIMEOUT: MillisDurationU32 = MillisDurationU32::millis(5000);

/// Sleep between button polls inside an edit screen.
pub const ADJUST_POLL_INTERVAL: MillisDurationU32 = MillisDurationU32::millis(100);
