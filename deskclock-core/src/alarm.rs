//! Alarm Trigger and Expiry
//!
//! The alarm fires when the clock reads exactly `hh:mm:00` for the target
//! time, then rings once per tick until either the user stops it or the
//! minute rolls over. Expiry on "minute no longer matches" also covers a
//! clock that was set backwards while ringing.
//!
//! ## Ring Cadence
//!
//! Each ringing tick flashes the LED strip in the alarm color on even
//! seconds (dark on odd ones) and plays a two-tone chirp four times, about
//! 400 ms of sound, leaving the buzzer silent for the rest of the second.

use embedded_hal::delay::DelayNs;

use crate::constants::alarm::{
    ALARM_BUZZER_DUTY, ALARM_TONE_HIGH_HZ, ALARM_TONE_LOW_HZ, ALARM_TONE_MS, ALARM_TONE_REPEATS,
};
use crate::macros::clock_info;
use crate::time::TimeOfDay;
use crate::traits::{Actuators, Rgb};

/// Outcome of one [`AlarmEngine::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmStatus {
    /// Not ringing
    #[default]
    Idle,
    /// Started ringing on this tick
    Triggered,
    /// Still ringing from an earlier tick
    Ringing,
    /// Stopped on this tick because the minute rolled over
    Expired,
}

impl AlarmStatus {
    /// Whether the alarm should sound on this tick
    pub fn is_sounding(self) -> bool {
        matches!(self, AlarmStatus::Triggered | AlarmStatus::Ringing)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlarmStatus {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AlarmStatus::Idle => defmt::write!(fmt, "idle"),
            AlarmStatus::Triggered => defmt::write!(fmt, "triggered"),
            AlarmStatus::Ringing => defmt::write!(fmt, "ringing"),
            AlarmStatus::Expired => defmt::write!(fmt, "expired"),
        }
    }
}

/// Daily alarm with auto-expiry
#[derive(Debug, Clone, Default)]
pub struct AlarmEngine {
    enabled: bool,
    hour: u8,
    minute: u8,
    triggered: bool,
    triggered_at: Option<TimeOfDay>,
}

impl AlarmEngine {
    /// Alarm at `hour:minute`
    pub fn new(enabled: bool, hour: u8, minute: u8) -> Self {
        Self { enabled, hour, minute, ..Self::default() }
    }

    /// Update enable flag and target time
    ///
    /// A ringing alarm keeps ringing until it expires or is reset.
    pub fn configure(&mut self, enabled: bool, hour: u8, minute: u8) {
        self.enabled = enabled;
        self.hour = hour;
        self.minute = minute;
    }

    /// Whether the alarm is armed
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Target hour and minute
    pub fn target(&self) -> (u8, u8) {
        (self.hour, self.minute)
    }

    /// Whether the alarm is ringing
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Time the current ring started
    pub fn triggered_at(&self) -> Option<TimeOfDay> {
        self.triggered_at
    }

    /// Evaluate once per tick
    pub fn check(&mut self, hour: u8, minute: u8, second: u8) -> AlarmStatus {
        if self.triggered {
            if minute != self.minute {
                self.triggered = false;
                self.triggered_at = None;
                clock_info!("Alarm expired at {:02}:{:02}:{:02}", hour, minute, second);
                return AlarmStatus::Expired;
            }
            return AlarmStatus::Ringing;
        }

        if self.enabled && hour == self.hour && minute == self.minute && second == 0 {
            self.triggered = true;
            self.triggered_at = Some(TimeOfDay::new(hour, minute, second));
            clock_info!("Alarm triggered at {:02}:{:02}", hour, minute);
            return AlarmStatus::Triggered;
        }

        AlarmStatus::Idle
    }

    /// Play one tick of the ring cadence
    pub fn sound<A, D>(&self, second: u8, color: Rgb, actuators: &mut A, delay: &mut D)
    where
        A: Actuators,
        D: DelayNs,
    {
        let flash = if second % 2 == 0 { color } else { Rgb::BLACK };
        actuators.set_led_color(flash);

        actuators.set_buzzer_duty(ALARM_BUZZER_DUTY);
        for _ in 0..ALARM_TONE_REPEATS {
            actuators.set_buzzer_tone(ALARM_TONE_HIGH_HZ);
            delay.delay_ms(ALARM_TONE_MS);
            actuators.set_buzzer_tone(ALARM_TONE_LOW_HZ);
            delay.delay_ms(ALARM_TONE_MS);
        }
        actuators.set_buzzer_duty(0);
    }

    /// Stop ringing now and put the LED strip back on `led_pattern`
    ///
    /// Safe to call whether or not the alarm is ringing.
    pub fn reset_trigger<A: Actuators>(&mut self, actuators: &mut A, led_pattern: u8) {
        if self.triggered {
            clock_info!("Alarm stopped by user");
        }
        self.triggered = false;
        self.triggered_at = None;
        silence(actuators, led_pattern);
    }
}

/// Buzzer off, LED strip back to its configured pattern
pub fn silence<A: Actuators>(actuators: &mut A, led_pattern: u8) {
    actuators.set_buzzer_duty(0);
    actuators.set_led_pattern(led_pattern);
}
