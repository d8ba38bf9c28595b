//! Time Source Abstractions
//!
//! Three different clocks feed the core:
//!
//! - [`TimeSource`]: free-running monotonic milliseconds, for intervals
//! - [`Rtc`]: the battery-backed calendar chip, for what the display shows
//! - [`NetworkTime`]: the NTP transport, for correcting the RTC

use core::fmt::Debug;

use crate::errors::NetworkError;
use crate::time::{Timestamp, WallClock};

/// Monotonic millisecond counter
///
/// Used only to measure intervals (debounce windows, sync freshness, edit
/// screen timeouts), never to tell the time of day.
///
/// ## Example Implementation
///
/// ```rust
/// use deskclock_core::traits::TimeSource;
/// use deskclock_core::time::Timestamp;
///
/// struct SysTick {
///     millis: u64,
/// }
///
/// impl TimeSource for SysTick {
///     fn now(&self) -> Timestamp {
///         self.millis
///     }
/// }
/// ```
///
/// ## Platform Notes
///
/// - **Bare metal**: a hardware timer extended to 64 bits in its overflow
///   interrupt
/// - **Linux**: `CLOCK_MONOTONIC`
/// - **Tests**: [`FixedTime`](crate::time::FixedTime) or a simulation clock
///   advanced by the delay provider
pub trait TimeSource {
    /// Milliseconds since an arbitrary fixed point (usually boot)
    fn now(&self) -> Timestamp;

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future
    fn elapsed_since(&self, earlier: Timestamp) -> u64 {
        self.now().saturating_sub(earlier)
    }
}

/// Battery-backed real-time clock chip
///
/// `read_time` is non-blocking: a busy bus reports
/// [`nb::Error::WouldBlock`] and the caller retries a bounded number of
/// times within the tick.
pub trait Rtc {
    /// Bus or device error
    type Error: Debug;

    /// Current local calendar fields
    fn read_time(&mut self) -> nb::Result<WallClock, Self::Error>;

    /// Overwrite the calendar fields
    fn set_time(&mut self, time: &WallClock) -> Result<(), Self::Error>;

    /// Oscillator aging trim (0-255, 128 is neutral)
    fn set_trim(&mut self, trim: u8) -> Result<(), Self::Error>;
}

/// Network time transport (NTP or similar)
pub trait NetworkTime {
    /// Seconds since the Unix epoch, UTC
    fn fetch_utc_timestamp(&mut self) -> Result<i64, NetworkError>;
}
