//! Clock Control Core
//!
//! [`ClockCore`] is the cooperative loop that ties the components together.
//! Firmware calls [`ClockCore::service`] once per main-loop iteration; each
//! call:
//!
//! 1. polls every button through the debouncer
//! 2. if the 1 Hz tick fired: re-syncs from the network when stale, reads
//!    the RTC, runs the alarm and repaints the changed display slots
//! 3. routes the button events: a long press of mode stops a ringing alarm,
//!    or, on the time screen, opens the edit screens
//!
//! The edit screens run modally inside step 3 until the ring is confirmed
//! through, abandoned, or left idle.
//!
//! ## Example
//!
//! ```rust,ignore
//! static TICK: TickFlag = TickFlag::new();
//!
//! #[interrupt]
//! fn EXTI0() {
//!     TICK.signal();
//! }
//!
//! let mut core = ClockCore::<_, _, 3>::builder(&timer, &TICK)
//!     .button(ButtonId::Mode, mode_pin, ButtonConfig::default())
//!     .button(ButtonId::Increment, left_pin, ButtonConfig::default())
//!     .button(ButtonId::Decrement, right_pin, ButtonConfig::default())
//!     .build()?;
//! let mut board = Board::new(rtc, ntp, store, display, leds, delay);
//!
//! core.start(&mut board);
//! loop {
//!     core.service(&mut board);
//! }
//! ```

mod adjust;
mod board;
mod builder;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use fugit::MillisDurationU32;

use crate::alarm::{self, AlarmEngine, AlarmStatus};
use crate::button::{ButtonDebouncer, ButtonEvent};
use crate::config::ClockConfig;
use crate::constants::time::RTC_READ_RETRIES;
use crate::display::{alarm_text, date_text, DisplayFormat, DisplayReconciler};
use crate::errors::ClockError;
use crate::macros::{clock_debug, clock_info, clock_warn};
use crate::mode::{Mode, ModeStateMachine, Trigger};
use crate::sync::TimeSyncManager;
use crate::tick::TickFlag;
use crate::time::WallClock;
use crate::traits::{Actuators, DigitDisplay, NetworkTime, Rtc, SettingsStore, TimeSource};

pub use board::Board;
pub use builder::ClockCoreBuilder;

/// What one [`ClockCore::service`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceReport {
    /// The 1 Hz tick was consumed
    pub ticked: bool,
    /// A network sync completed
    pub synced: bool,
    /// Alarm state after this call
    pub alarm: AlarmStatus,
    /// Button events that changed something
    pub events_handled: u8,
    /// Digit, separator and text writes for the time screen
    pub display_writes: usize,
    /// Screen after this call
    pub mode: Mode,
}

/// The clock's control loop
///
/// Generic over the monotonic time source `T`, the button pin type `P` and
/// the number of button slots `B`.
pub struct ClockCore<'t, T, P, const B: usize> {
    time: &'t T,
    tick: &'t TickFlag,
    buttons: ButtonDebouncer<P, B>,
    sync: TimeSyncManager,
    alarm: AlarmEngine,
    reconciler: DisplayReconciler,
    modes: ModeStateMachine,
    config: ClockConfig,
    adjust_timeout: MillisDurationU32,
    poll_interval: MillisDurationU32,
}

impl<'t, T: TimeSource, P: InputPin, const B: usize> ClockCore<'t, T, P, B> {
    /// Start building a core
    pub fn builder(time: &'t T, tick: &'t TickFlag) -> ClockCoreBuilder<'t, T, P, B> {
        ClockCoreBuilder::new(time, tick)
    }

    /// Typed settings currently in effect
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Current screen
    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    /// Sync state
    pub fn sync(&self) -> &TimeSyncManager {
        &self.sync
    }

    /// Alarm state
    pub fn alarm(&self) -> &AlarmEngine {
        &self.alarm
    }

    /// Load the settings and bring every peripheral in line with them
    pub fn start<R, N, S, D, A, Y>(&mut self, board: &mut Board<R, N, S, D, A, Y>)
    where
        R: Rtc,
        N: NetworkTime,
        S: SettingsStore,
        D: DigitDisplay,
        A: Actuators,
        Y: DelayNs,
    {
        self.update_display_state(board);
        clock_info!(
            "Clock started: alarm {} {:02}:{:02}, UTC{:+}, {}",
            if self.config.alarm_enabled { "on" } else { "off" },
            self.config.alarm_hour,
            self.config.alarm_minute,
            self.config.utc_offset_hours,
            self.config.dst_mode.name()
        );
    }

    /// Reload the settings after an external change and repaint
    ///
    /// A changed UTC offset or DST mode forces a resync on the next tick.
    pub fn update_display_state<R, N, S, D, A, Y>(&mut self, board: &mut Board<R, N, S, D, A, Y>)
    where
        R: Rtc,
        N: NetworkTime,
        S: SettingsStore,
        D: DigitDisplay,
        A: Actuators,
        Y: DelayNs,
    {
        self.config = ClockConfig::load(&board.store);
        let c = self.config;

        self.alarm.configure(c.alarm_enabled, c.alarm_hour, c.alarm_minute);

        if self.sync.utc_offset_hours() != c.utc_offset_hours || self.sync.dst_mode() != c.dst_mode
        {
            self.sync.set_utc_offset(c.utc_offset_hours);
            self.sync.set_dst_mode(c.dst_mode);
            self.sync.invalidate();
        }

        if let Err(_e) = board.rtc.set_trim(c.rtc_trim) {
            clock_warn!("RTC trim failed: {:?}", _e);
        }

        if let Err(_e) = apply_display_attributes(&mut board.display, &c) {
            clock_warn!("display setup failed: {:?}", _e);
        }
        self.reconciler.invalidate();

        if !self.alarm.is_triggered() {
            board.actuators.set_led_color(c.led_color);
            board.actuators.set_led_pattern(c.led_mode);
        }
    }

    /// One main-loop iteration
    pub fn service<R, N, S, D, A, Y>(&mut self, board: &mut Board<R, N, S, D, A, Y>) -> ServiceReport
    where
        R: Rtc,
        N: NetworkTime,
        S: SettingsStore,
        D: DigitDisplay,
        A: Actuators,
        Y: DelayNs,
    {
        let mut report = ServiceReport::default();
        let events = self.buttons.poll_all(self.time.now());

        if self.tick.take() {
            report.ticked = true;
            report.synced = self.sync_if_due(board);
            match read_rtc(&mut board.rtc) {
                Ok(now) => {
                    report.alarm = self.run_alarm(board, &now);
                    report.display_writes = self.render_time(board, &now);
                }
                Err(_e) => {
                    clock_warn!("tick skipped: {}", _e);
                    if self.alarm.is_triggered() {
                        report.alarm = AlarmStatus::Ringing;
                    }
                }
            }
        } else if self.alarm.is_triggered() {
            report.alarm = AlarmStatus::Ringing;
        }

        for event in events {
            if self.handle_event(board, event) {
                report.events_handled = report.events_handled.saturating_add(1);
            }
        }

        if report.alarm.is_sounding() && !self.alarm.is_triggered() {
            report.alarm = AlarmStatus::Idle;
        }
        report.mode = self.modes.current();
        report
    }

    /// Route one button event; returns whether it changed anything
    ///
    /// While the alarm rings only a long press of mode is accepted, and it
    /// stops the alarm. On the time screen a long press of mode opens the
    /// edit screens.
    pub fn handle_event<R, N, S, D, A, Y>(
        &mut self,
        board: &mut Board<R, N, S, D, A, Y>,
        event: ButtonEvent,
    ) -> bool
    where
        R: Rtc,
        N: NetworkTime,
        S: SettingsStore,
        D: DigitDisplay,
        A: Actuators,
        Y: DelayNs,
    {
        clock_debug!("button {} {:?}", event.button.name(), event.press);

        if self.alarm.is_triggered() {
            if event.is_mode_long() {
                self.alarm.reset_trigger(&mut board.actuators, self.config.led_mode);
                return true;
            }
            return false;
        }

        if self.modes.current() == Mode::Time && event.is_mode_long() {
            self.modes.fire(Trigger::Enter);
            self.run_edit_session(board);
            return true;
        }

        false
    }

    fn sync_if_due<R, N, S, D, A, Y>(&mut self, board: &mut Board<R, N, S, D, A, Y>) -> bool
    where
        R: Rtc,
        N: NetworkTime,
        Y: DelayNs,
    {
        let now = self.time.now();
        let Board { rtc, network, delay, .. } = board;
        self.sync.check_sync(now, network, delay, |local| {
            rtc.set_time(local).map_err(|_e| {
                clock_warn!("RTC write failed: {:?}", _e);
                ClockError::RtcUnavailable
            })
        })
    }

    fn run_alarm<R, N, S, D, A, Y>(
        &mut self,
        board: &mut Board<R, N, S, D, A, Y>,
        now: &WallClock,
    ) -> AlarmStatus
    where
        A: Actuators,
        Y: DelayNs,
    {
        let status = self.alarm.check(now.hour, now.minute, now.second);
        match status {
            AlarmStatus::Triggered | AlarmStatus::Ringing => self.alarm.sound(
                now.second,
                self.config.led_alarm_color,
                &mut board.actuators,
                &mut board.delay,
            ),
            AlarmStatus::Expired => alarm::silence(&mut board.actuators, self.config.led_mode),
            AlarmStatus::Idle => {}
        }
        status
    }

    fn render_time<R, N, S, D, A, Y>(
        &mut self,
        board: &mut Board<R, N, S, D, A, Y>,
        now: &WallClock,
    ) -> usize
    where
        D: DigitDisplay,
    {
        let config = &self.config;
        let format = DisplayFormat {
            show_seconds: config.show_seconds,
            twelve_hour: !config.twenty_four_hour,
        };
        self.reconciler.render(&mut board.display, now.time_of_day(), format, || {
            if config.show_date {
                date_text(now)
            } else {
                alarm_text(config.alarm_enabled, config.alarm_hour, config.alarm_minute)
            }
        })
    }
}

/// Brightness and font, then a blank face ready for a full repaint
fn apply_display_attributes<D: DigitDisplay>(display: &mut D, config: &ClockConfig) -> Result<(), D::Error> {
    display.set_brightness(config.brightness)?;
    display.set_font(config.font, config.font_color)?;
    display.clear()
}

/// Read the RTC, retrying a busy bus a few times
pub(crate) fn read_rtc<R: Rtc>(rtc: &mut R) -> Result<WallClock, ClockError> {
    for _ in 0..RTC_READ_RETRIES {
        match rtc.read_time() {
            Ok(time) => return Ok(time),
            Err(nb::Error::WouldBlock) => continue,
            Err(nb::Error::Other(_e)) => {
                clock_debug!("RTC read failed: {:?}", _e);
                return Err(ClockError::RtcUnavailable);
            }
        }
    }
    Err(ClockError::RtcUnavailable)
}
