//! Alarm Cadence Constants
//!
//! One tick of ringing plays a two-tone chirp four times, roughly 400 ms of
//! sound per second, and blinks the LEDs on even seconds.

/// First tone of the chirp (Hz).
pub const ALARM_TONE_HIGH_HZ: u32 = 2000;

/// Second tone of the chirp (Hz).
pub const ALARM_TONE_LOW_HZ: u32 = 1800;

/// Duration of each tone (ms).
pub const ALARM_TONE_MS: u32 = 50;

/// Chirps per tick.
pub const ALARM_TONE_REPEATS: u8 = 4;

/// Buzzer duty cycle while sounding (50 %).
pub const ALARM_BUZZER_DUTY: u16 = 32_768;
