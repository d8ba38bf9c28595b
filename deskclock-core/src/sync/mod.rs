//! Network Time Synchronization
//!
//! The RTC keeps local time between syncs; [`TimeSyncManager`] decides when
//! the RTC is stale and corrects it from the network.
//!
//! ## Freshness
//!
//! The clock counts as synced while `now - last_sync < interval`. Once that
//! window lapses, the next [`check_sync`](TimeSyncManager::check_sync) makes
//! one synchronization attempt.
//!
//! ## Attempt
//!
//! 1. Request UTC from the network, retrying up to the retry budget with a
//!    fixed sleep between requests
//! 2. Apply the UTC offset plus one hour when summer time is in effect
//! 3. Hand the local calendar fields to the RTC setter
//! 4. Record the sync time only if the setter succeeded
//!
//! An exhausted retry budget is not fatal: the RTC keeps running on its own
//! oscillator and the attempt repeats on the next check.

pub mod dst;

use embedded_hal::delay::DelayNs;
use fugit::{MillisDurationU32, SecsDurationU32};

use crate::constants::time::{
    DEFAULT_SYNC_INTERVAL, DST_SHIFT_SECONDS, MS_PER_SECOND, SECONDS_PER_HOUR, SYNC_MAX_RETRIES,
    SYNC_RETRY_DELAY, UTC_OFFSET_MAX_HOURS, UTC_OFFSET_MIN_HOURS,
};
use crate::errors::{ClockError, NetworkError, SyncError};
use crate::macros::{clock_debug, clock_info, clock_warn};
use crate::time::{Timestamp, WallClock};
use crate::traits::NetworkTime;

pub use dst::{is_dst, DstMode, DstRegion, DstTransitions};

/// Keeps the RTC within the freshness window
#[derive(Debug, Clone)]
pub struct TimeSyncManager {
    interval: SecsDurationU32,
    retry_delay: MillisDurationU32,
    max_retries: u8,
    last_sync: Option<Timestamp>,
    utc_offset_hours: i8,
    dst_mode: DstMode,
    transitions: Option<DstTransitions>,
}

impl Default for TimeSyncManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSyncManager {
    /// Hourly sync, two retries two seconds apart, UTC, EU rule
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_SYNC_INTERVAL,
            retry_delay: SYNC_RETRY_DELAY,
            max_retries: SYNC_MAX_RETRIES,
            last_sync: None,
            utc_offset_hours: 0,
            dst_mode: DstMode::default(),
            transitions: None,
        }
    }

    /// Set the freshness window
    pub fn with_interval(mut self, interval: SecsDurationU32) -> Self {
        self.interval = interval;
        self
    }

    /// Set the sleep between failed requests
    pub fn with_retry_delay(mut self, delay: MillisDurationU32) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the number of retries after the first failed request
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Freshness window
    pub fn interval(&self) -> SecsDurationU32 {
        self.interval
    }

    /// Monotonic time of the last successful sync
    pub fn last_sync(&self) -> Option<Timestamp> {
        self.last_sync
    }

    /// Whether the last sync is younger than the interval
    pub fn is_synced(&self, now: Timestamp) -> bool {
        let window = u64::from(self.interval.to_secs()) * MS_PER_SECOND;
        self.last_sync
            .is_some_and(|last| now.saturating_sub(last) < window)
    }

    /// Force a sync on the next check
    pub fn invalidate(&mut self) {
        self.last_sync = None;
    }

    /// Offset of local standard time from UTC
    pub fn utc_offset_hours(&self) -> i8 {
        self.utc_offset_hours
    }

    /// Change the UTC offset, clamped to [-12, 12]. Applies from the next sync.
    pub fn set_utc_offset(&mut self, hours: i8) {
        let clamped = hours.clamp(UTC_OFFSET_MIN_HOURS, UTC_OFFSET_MAX_HOURS);
        if clamped != hours {
            clock_warn!("UTC offset {} clamped to {}", hours, clamped);
        }
        self.utc_offset_hours = clamped;
    }

    /// Current DST setting
    pub fn dst_mode(&self) -> DstMode {
        self.dst_mode
    }

    /// Change the DST setting. Applies from the next sync.
    pub fn set_dst_mode(&mut self, mode: DstMode) {
        if mode != self.dst_mode {
            self.dst_mode = mode;
            self.transitions = None;
        }
    }

    /// Whether summer time applies at `utc` under the current mode
    ///
    /// Transition instants are cached and recomputed when the year changes.
    pub fn is_dst(&mut self, utc: i64) -> bool {
        let region = match self.dst_mode {
            DstMode::Off => return false,
            DstMode::On => return true,
            DstMode::AutoEu => DstRegion::Eu,
            DstMode::AutoNa => DstRegion::Na,
        };
        let Some(year) = dst::year_of(utc) else {
            return false;
        };
        if self.transitions.map_or(true, |t| t.year != year) {
            self.transitions = DstTransitions::for_year(region, year);
            clock_debug!("DST transitions for {}: {:?}", year, self.transitions);
        }
        self.transitions.is_some_and(|t| t.contains(utc))
    }

    /// Local calendar fields for a UTC timestamp
    pub fn local_time(&mut self, utc: i64) -> Result<WallClock, SyncError> {
        let dst = if self.is_dst(utc) { DST_SHIFT_SECONDS } else { 0 };
        let invalid = SyncError::InvalidTimestamp { timestamp: utc };
        let local = i64::from(self.utc_offset_hours)
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|offset| utc.checked_add(offset))
            .and_then(|local| local.checked_add(dst))
            .ok_or(invalid)?;
        WallClock::from_unix(local).ok_or(invalid)
    }

    /// Sync if stale; returns whether a sync happened on this call
    ///
    /// Failures are logged and leave the last sync time untouched.
    pub fn check_sync<N, D, F>(
        &mut self,
        now: Timestamp,
        network: &mut N,
        delay: &mut D,
        set_rtc: F,
    ) -> bool
    where
        N: NetworkTime,
        D: DelayNs,
        F: FnOnce(&WallClock) -> Result<(), ClockError>,
    {
        if self.is_synced(now) {
            return false;
        }
        match self.synchronize(now, network, delay, set_rtc) {
            Ok(local) => {
                clock_info!(
                    "Time synced: {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    local.year,
                    local.month,
                    local.day,
                    local.hour,
                    local.minute,
                    local.second
                );
                true
            }
            Err(e) => {
                clock_warn!("Time sync failed: {}", e);
                false
            }
        }
    }

    /// One synchronization attempt, regardless of freshness
    pub fn synchronize<N, D, F>(
        &mut self,
        now: Timestamp,
        network: &mut N,
        delay: &mut D,
        set_rtc: F,
    ) -> Result<WallClock, ClockError>
    where
        N: NetworkTime,
        D: DelayNs,
        F: FnOnce(&WallClock) -> Result<(), ClockError>,
    {
        let utc = self.fetch_with_retry(network, delay)?;
        let local = self.local_time(utc)?;
        set_rtc(&local)?;
        self.last_sync = Some(now);
        Ok(local)
    }

    fn fetch_with_retry<N, D>(&self, network: &mut N, delay: &mut D) -> Result<i64, SyncError>
    where
        N: NetworkTime,
        D: DelayNs,
    {
        let attempts = self.max_retries.saturating_add(1);
        let mut last = NetworkError::NotConnected;
        for attempt in 1..=attempts {
            match network.fetch_utc_timestamp() {
                Ok(utc) => return Ok(utc),
                Err(e) => {
                    clock_warn!("Time request {}/{} failed: {}", attempt, attempts, e);
                    last = e;
                    if attempt < attempts {
                        delay.delay_ms(self.retry_delay.to_millis());
                    }
                }
            }
        }
        Err(SyncError::RetriesExhausted { attempts, last })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    struct Scripted {
        replies: Vec<Result<i64, NetworkError>>,
        calls: usize,
    }

    impl Scripted {
        fn new(replies: &[Result<i64, NetworkError>]) -> Self {
            Self { replies: replies.to_vec(), calls: 0 }
        }
    }

    impl NetworkTime for Scripted {
        fn fetch_utc_timestamp(&mut self) -> Result<i64, NetworkError> {
            let reply = self.replies.get(self.calls).copied().unwrap_or(Err(NetworkError::Timeout));
            self.calls += 1;
            reply
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ms: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += u64::from(ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += u64::from(ms);
        }
    }

    const NOON_JUNE: i64 = 1_718_452_800; // 2024-06-15 12:00Z

    #[test]
    fn stale_until_first_sync() {
        let sync = TimeSyncManager::new();
        assert!(!sync.is_synced(0));
        assert_eq!(sync.last_sync(), None);
    }

    #[test]
    fn fresh_within_interval() {
        let mut sync = TimeSyncManager::new().with_interval(SecsDurationU32::secs(10));
        let mut net = Scripted::new(&[Ok(NOON_JUNE)]);
        let mut delay = CountingDelay::default();

        assert!(sync.check_sync(1_000, &mut net, &mut delay, |_| Ok(())));
        assert!(sync.is_synced(10_999));
        assert!(!sync.is_synced(11_000));
        assert!(!sync.check_sync(5_000, &mut net, &mut delay, |_| Ok(())));
        assert_eq!(net.calls, 1);
    }

    #[test]
    fn two_failures_then_success() {
        let mut sync = TimeSyncManager::new();
        let mut net = Scripted::new(&[
            Err(NetworkError::Timeout),
            Err(NetworkError::Unreachable),
            Ok(NOON_JUNE),
        ]);
        let mut delay = CountingDelay::default();
        let mut written = None;

        assert!(sync.check_sync(42, &mut net, &mut delay, |wc| {
            written = Some(*wc);
            Ok(())
        }));
        assert_eq!(sync.last_sync(), Some(42));
        assert_eq!(delay.total_ms, 4_000);
        // UTC offset 0, EU summer time
        assert_eq!(written, WallClock::new(2024, 6, 15, 13, 0, 0));
    }

    #[test]
    fn three_failures_leave_state_alone() {
        let mut sync = TimeSyncManager::new();
        let mut net = Scripted::new(&[
            Err(NetworkError::Timeout),
            Err(NetworkError::Timeout),
            Err(NetworkError::Timeout),
            Ok(NOON_JUNE),
        ]);
        let mut delay = CountingDelay::default();
        let mut setter_called = false;

        assert!(!sync.check_sync(42, &mut net, &mut delay, |_| {
            setter_called = true;
            Ok(())
        }));
        assert!(!setter_called);
        assert_eq!(sync.last_sync(), None);
        assert_eq!(net.calls, 3);
        assert_eq!(delay.total_ms, 4_000);
    }

    #[test]
    fn exhaustion_reports_last_error() {
        let mut sync = TimeSyncManager::new().with_max_retries(0);
        let mut net = Scripted::new(&[Err(NetworkError::NotConnected)]);
        let mut delay = CountingDelay::default();

        let err = sync.synchronize(0, &mut net, &mut delay, |_| Ok(())).unwrap_err();
        assert_eq!(
            err,
            ClockError::Sync(SyncError::RetriesExhausted { attempts: 1, last: NetworkError::NotConnected })
        );
        assert_eq!(delay.total_ms, 0);
    }

    #[test]
    fn failed_rtc_write_is_not_a_sync() {
        let mut sync = TimeSyncManager::new();
        let mut net = Scripted::new(&[Ok(NOON_JUNE)]);
        let mut delay = CountingDelay::default();

        assert!(!sync.check_sync(0, &mut net, &mut delay, |_| Err(ClockError::RtcUnavailable)));
        assert_eq!(sync.last_sync(), None);
    }

    #[test]
    fn offset_and_mode_shape_local_time() {
        let mut sync = TimeSyncManager::new();
        sync.set_utc_offset(-5);
        sync.set_dst_mode(DstMode::AutoNa);
        assert_eq!(sync.local_time(NOON_JUNE).unwrap().hour, 8);

        sync.set_dst_mode(DstMode::Off);
        assert_eq!(sync.local_time(NOON_JUNE).unwrap().hour, 7);

        sync.set_dst_mode(DstMode::On);
        assert_eq!(sync.local_time(1_705_300_200).unwrap().hour, 2); // January 06:30Z
    }

    #[test]
    fn offset_clamped() {
        let mut sync = TimeSyncManager::new();
        sync.set_utc_offset(14);
        assert_eq!(sync.utc_offset_hours(), 12);
        sync.set_utc_offset(-13);
        assert_eq!(sync.utc_offset_hours(), -12);
    }

    #[test]
    fn local_time_crosses_midnight() {
        let mut sync = TimeSyncManager::new();
        sync.set_utc_offset(12);
        let local = sync.local_time(NOON_JUNE).unwrap();
        assert_eq!((local.day, local.hour), (16, 1));
    }

    #[test]
    fn out_of_range_reply_is_invalid() {
        let mut sync = TimeSyncManager::new();
        sync.set_utc_offset(1);
        let utc = i64::MAX - 10;
        assert_eq!(sync.local_time(utc), Err(SyncError::InvalidTimestamp { timestamp: utc }));

        let mut net = Scripted::new(&[Ok(utc)]);
        let mut delay = CountingDelay::default();
        assert!(!sync.check_sync(0, &mut net, &mut delay, |_| Ok(())));
        assert_eq!(sync.last_sync(), None);
    }

    #[test]
    fn invalidate_forces_resync() {
        let mut sync = TimeSyncManager::new();
        let mut net = Scripted::new(&[Ok(NOON_JUNE), Ok(NOON_JUNE)]);
        let mut delay = CountingDelay::default();

        assert!(sync.check_sync(0, &mut net, &mut delay, |_| Ok(())));
        sync.invalidate();
        assert!(sync.check_sync(1, &mut net, &mut delay, |_| Ok(())));
        assert_eq!(net.calls, 2);
    }

    #[test]
    fn transition_cache_tracks_year() {
        let mut sync = TimeSyncManager::new();
        assert!(sync.is_dst(NOON_JUNE));
        assert_eq!(sync.transitions.map(|t| t.year), Some(2024));
        assert!(sync.is_dst(1_743_296_400)); // 2025-03-30 01:00Z
        assert_eq!(sync.transitions.map(|t| t.year), Some(2025));
    }
}
