//! Edit screens
//!
//! Each edit screen shows its caption and current value, then polls the
//! buttons every poll interval:
//!
//! - increment (short): value up, wrapping from max to min
//! - decrement (short): value down, wrapping from min to max
//! - mode (short): confirm, go to the next screen
//! - mode (long): abandon the ring, back to the time screen
//!
//! Every change is written through immediately (store, RTC or peripheral),
//! so leaving by timeout keeps what was set.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::button::{ButtonId, Press};
use crate::config::SettingKey;
use crate::macros::{clock_debug, clock_warn};
use crate::mode::{AdjustSpec, EditTarget, Mode, Trigger};
use crate::traits::{Actuators, DigitDisplay, NetworkTime, Rtc, SettingsStore, TimeSource};

use super::{read_rtc, Board, ClockCore};

impl<'t, T: TimeSource, P: InputPin, const B: usize> ClockCore<'t, T, P, B> {
    /// Run edit screens until the ring returns to the time screen
    pub(super) fn run_edit_session<R, N, S, D, A, Y>(&mut self, board: &mut Board<R, N, S, D, A, Y>)
    where
        R: Rtc,
        N: NetworkTime,
        S: SettingsStore,
        D: DigitDisplay,
        A: Actuators,
        Y: DelayNs,
    {
        while self.modes.current().is_edit() {
            let mode = self.modes.current();
            let trigger = self.adjust(board, mode);
            self.modes.fire(trigger);
        }

        if let Err(_e) = board.display.clear() {
            clock_debug!("display clear failed: {:?}", _e);
        }
        self.reconciler.invalidate();
    }

    /// One edit screen; returns how it was left
    fn adjust<R, N, S, D, A, Y>(&mut self, board: &mut Board<R, N, S, D, A, Y>, mode: Mode) -> Trigger
    where
        R: Rtc,
        S: SettingsStore,
        D: DigitDisplay,
        A: Actuators,
        Y: DelayNs,
    {
        let Some(spec) = mode.adjust_spec() else {
            return Trigger::Cancel;
        };

        if let Err(_e) = board.display.clear() {
            clock_debug!("display clear failed: {:?}", _e);
        }
        self.reconciler.invalidate();
        if let Err(_e) = board.display.write_text(0, mode.label()) {
            clock_debug!("caption write failed: {:?}", _e);
        }

        let Some(mut value) = self.current_value(board, spec.target) else {
            clock_warn!("{} unavailable, leaving edit screens", mode.label());
            return Trigger::Cancel;
        };
        self.show_value(board, &spec, value);

        let timeout = u64::from(self.adjust_timeout.to_millis());
        let mut last_press = self.time.now();
        loop {
            let now = self.time.now();
            for event in self.buttons.poll_all(now) {
                last_press = now;
                let next = match (event.button, event.press) {
                    (ButtonId::Mode, Press::Short) => return Trigger::Confirm,
                    (ButtonId::Mode, Press::Long) => return Trigger::Cancel,
                    (ButtonId::Increment, Press::Short) => spec.range.next(value),
                    (ButtonId::Decrement, Press::Short) => spec.range.prev(value),
                    _ => continue,
                };
                if next != value {
                    value = next;
                    self.commit(board, spec.target, value);
                    self.show_value(board, &spec, value);
                }
            }

            if self.time.elapsed_since(last_press) >= timeout {
                return Trigger::Timeout;
            }
            board.delay.delay_ms(self.poll_interval.to_millis());
        }
    }

    fn current_value<R, N, S, D, A, Y>(
        &self,
        board: &mut Board<R, N, S, D, A, Y>,
        target: EditTarget,
    ) -> Option<i32>
    where
        R: Rtc,
    {
        match target {
            EditTarget::Setting(key) => self.config.numeric(key),
            EditTarget::RtcHour => read_rtc(&mut board.rtc).ok().map(|t| i32::from(t.hour)),
            EditTarget::RtcMinute => read_rtc(&mut board.rtc).ok().map(|t| i32::from(t.minute)),
        }
    }

    fn show_value<R, N, S, D, A, Y>(
        &mut self,
        board: &mut Board<R, N, S, D, A, Y>,
        spec: &AdjustSpec,
        value: i32,
    ) where
        D: DigitDisplay,
    {
        let (position, digits) = spec.format.placement();
        self.reconciler
            .show_number(&mut board.display, spec.format.shown(value), position, digits);
    }

    /// Write `value` through to wherever it lives
    fn commit<R, N, S, D, A, Y>(
        &mut self,
        board: &mut Board<R, N, S, D, A, Y>,
        target: EditTarget,
        value: i32,
    ) where
        R: Rtc,
        S: SettingsStore,
        D: DigitDisplay,
        A: Actuators,
    {
        let key = match target {
            EditTarget::Setting(key) => key,
            EditTarget::RtcHour | EditTarget::RtcMinute => {
                self.commit_rtc_field(board, target, value);
                return;
            }
        };

        if self.config.set_numeric(key, value).is_none() {
            return;
        }
        if let Err(_e) = self.config.save(key, &mut board.store) {
            clock_warn!("saving {} failed: {}", key.name(), _e);
        }

        let c = self.config;
        match key {
            SettingKey::AlarmOn | SettingKey::AlarmHour | SettingKey::AlarmMinute => {
                self.alarm.configure(c.alarm_enabled, c.alarm_hour, c.alarm_minute);
            }
            SettingKey::Brightness => {
                if let Err(_e) = board.display.set_brightness(c.brightness) {
                    clock_debug!("brightness write failed: {:?}", _e);
                }
            }
            SettingKey::LedMode => board.actuators.set_led_pattern(c.led_mode),
            SettingKey::AdjustTiming => {
                if let Err(_e) = board.rtc.set_trim(c.rtc_trim) {
                    clock_warn!("RTC trim failed: {:?}", _e);
                }
            }
            _ => {}
        }
    }

    fn commit_rtc_field<R, N, S, D, A, Y>(
        &mut self,
        board: &mut Board<R, N, S, D, A, Y>,
        target: EditTarget,
        value: i32,
    ) where
        R: Rtc,
    {
        let mut time = match read_rtc(&mut board.rtc) {
            Ok(time) => time,
            Err(_e) => {
                clock_warn!("cannot set clock: {}", _e);
                return;
            }
        };
        // edit ranges keep hour and minute inside u8
        match target {
            EditTarget::RtcHour => time.hour = value as u8,
            EditTarget::RtcMinute => time.minute = value as u8,
            EditTarget::Setting(_) => return,
        }
        if let Err(_e) = board.rtc.set_time(&time) {
            clock_warn!("RTC write failed: {:?}", _e);
        }
    }
}
