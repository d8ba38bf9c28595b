//! Screen Modes
//!
//! The clock is either showing the time or editing one setting. Edit screens
//! form a ring entered from [`Mode::Time`] with a long press of the mode
//! button:
//!
//! ```text
//! Time -> AlarmToggle -> SetAlarmHour -> SetAlarmMinute -> SetHour -> SetMinute
//!      -> SetBrightness -> SetLedMode -> Set12h24h -> ShowSeconds -> AdjustTiming -> Time
//! ```
//!
//! Confirming advances to the successor. Timeout or cancel from any edit
//! screen returns to `Time`.

use core::str::FromStr;

use crate::config::{SettingKey, ValueRange};
use crate::errors::ClockError;
use crate::macros::{clock_info, clock_warn};

/// Closed set of screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Resting screen: the time
    #[default]
    Time,
    /// Alarm on/off
    AlarmToggle,
    /// Alarm hour
    SetAlarmHour,
    /// Alarm minute
    SetAlarmMinute,
    /// RTC hour
    SetHour,
    /// RTC minute
    SetMinute,
    /// Backlight
    SetBrightness,
    /// LED animation
    SetLedMode,
    /// 12- or 24-hour display
    Set12h24h,
    /// Seconds shown
    ShowSeconds,
    /// RTC oscillator trim
    AdjustTiming,
}

/// Mode transition cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Long press of mode on the time screen
    Enter,
    /// Mode pressed on an edit screen
    Confirm,
    /// No button for the idle timeout
    Timeout,
    /// Edit abandoned
    Cancel,
}

/// How an edit screen shows its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// 0/1 in the last slot
    Flag,
    /// Two digits in the hour slots
    Hour,
    /// Two digits in the minute slots
    Minute,
    /// `12` or `24` in the minute slots
    HourFormat,
    /// Up to three digits ending in the last slot
    Level,
}

impl ValueFormat {
    /// First slot and digit count
    pub const fn placement(self) -> (usize, usize) {
        match self {
            ValueFormat::Flag => (5, 1),
            ValueFormat::Hour => (2, 2),
            ValueFormat::Minute => (4, 2),
            ValueFormat::HourFormat => (4, 2),
            ValueFormat::Level => (3, 3),
        }
    }

    /// Number to put on the digits for `value`
    pub const fn shown(self, value: i32) -> u32 {
        match self {
            ValueFormat::HourFormat => {
                if value == 0 {
                    12
                } else {
                    24
                }
            }
            _ => value.unsigned_abs(),
        }
    }
}

/// Where an edit screen's value lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// A persisted setting
    Setting(SettingKey),
    /// The RTC's hour field
    RtcHour,
    /// The RTC's minute field
    RtcMinute,
}

/// Everything an edit screen needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustSpec {
    /// Value being edited
    pub target: EditTarget,
    /// Limits and step
    pub range: ValueRange,
    /// Display placement
    pub format: ValueFormat,
}

impl Mode {
    /// Edit screens in ring order
    pub const EDIT_RING: [Mode; 10] = [
        Mode::AlarmToggle,
        Mode::SetAlarmHour,
        Mode::SetAlarmMinute,
        Mode::SetHour,
        Mode::SetMinute,
        Mode::SetBrightness,
        Mode::SetLedMode,
        Mode::Set12h24h,
        Mode::ShowSeconds,
        Mode::AdjustTiming,
    ];

    /// Next screen on confirm
    pub const fn successor(self) -> Mode {
        match self {
            Mode::Time => Mode::AlarmToggle,
            Mode::AlarmToggle => Mode::SetAlarmHour,
            Mode::SetAlarmHour => Mode::SetAlarmMinute,
            Mode::SetAlarmMinute => Mode::SetHour,
            Mode::SetHour => Mode::SetMinute,
            Mode::SetMinute => Mode::SetBrightness,
            Mode::SetBrightness => Mode::SetLedMode,
            Mode::SetLedMode => Mode::Set12h24h,
            Mode::Set12h24h => Mode::ShowSeconds,
            Mode::ShowSeconds => Mode::AdjustTiming,
            Mode::AdjustTiming => Mode::Time,
        }
    }

    /// Caption shown on entry
    pub const fn label(self) -> &'static str {
        match self {
            Mode::Time => "Time",
            Mode::AlarmToggle => "Alarm On/ Off",
            Mode::SetAlarmHour => "Set Alarm Hour",
            Mode::SetAlarmMinute => "Set Alarm Min",
            Mode::SetHour => "Set Hour",
            Mode::SetMinute => "Set Min",
            Mode::SetBrightness => "Set Back Light",
            Mode::SetLedMode => "Set LED Mode",
            Mode::Set12h24h => "Set 12/24 Hours",
            Mode::ShowSeconds => "Show Secs",
            Mode::AdjustTiming => "Adjust Timing",
        }
    }

    /// Snake-case identifier
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Time => "time",
            Mode::AlarmToggle => "alarm_toggle",
            Mode::SetAlarmHour => "set_alarm_hour",
            Mode::SetAlarmMinute => "set_alarm_minute",
            Mode::SetHour => "set_hour",
            Mode::SetMinute => "set_minute",
            Mode::SetBrightness => "set_brightness",
            Mode::SetLedMode => "set_led_mode",
            Mode::Set12h24h => "set_12h_24h",
            Mode::ShowSeconds => "show_seconds",
            Mode::AdjustTiming => "adjust_timing",
        }
    }

    /// Whether this is an edit screen
    pub const fn is_edit(self) -> bool {
        !matches!(self, Mode::Time)
    }

    /// Value-adjust parameters; `None` for the time screen
    pub const fn adjust_spec(self) -> Option<AdjustSpec> {
        let (target, format) = match self {
            Mode::Time => return None,
            Mode::AlarmToggle => (EditTarget::Setting(SettingKey::AlarmOn), ValueFormat::Flag),
            Mode::SetAlarmHour => (EditTarget::Setting(SettingKey::AlarmHour), ValueFormat::Hour),
            Mode::SetAlarmMinute => {
                (EditTarget::Setting(SettingKey::AlarmMinute), ValueFormat::Minute)
            }
            Mode::SetHour => (EditTarget::RtcHour, ValueFormat::Hour),
            Mode::SetMinute => (EditTarget::RtcMinute, ValueFormat::Minute),
            Mode::SetBrightness => (EditTarget::Setting(SettingKey::Brightness), ValueFormat::Level),
            Mode::SetLedMode => (EditTarget::Setting(SettingKey::LedMode), ValueFormat::Minute),
            Mode::Set12h24h => {
                (EditTarget::Setting(SettingKey::TwentyFourHour), ValueFormat::HourFormat)
            }
            Mode::ShowSeconds => (EditTarget::Setting(SettingKey::ShowSeconds), ValueFormat::Flag),
            Mode::AdjustTiming => {
                (EditTarget::Setting(SettingKey::AdjustTiming), ValueFormat::Level)
            }
        };
        let range = match target {
            EditTarget::RtcHour => ValueRange::new(0, 23),
            EditTarget::RtcMinute => ValueRange::new(0, 59),
            EditTarget::Setting(key) => match key.range() {
                Some(range) => range,
                None => return None,
            },
        };
        Some(AdjustSpec { target, range, format })
    }

    /// Transition table
    pub const fn next(self, trigger: Trigger) -> Mode {
        match (self, trigger) {
            (Mode::Time, Trigger::Enter) => Mode::AlarmToggle,
            (Mode::Time, _) => Mode::Time,
            (_, Trigger::Confirm) => self.successor(),
            (_, Trigger::Timeout | Trigger::Cancel) => Mode::Time,
            (_, Trigger::Enter) => self,
        }
    }
}

impl FromStr for Mode {
    type Err = ClockError;

    /// Accepts captions (`"Set Alarm Hour"`) and names (`"set_alarm_hour"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        core::iter::once(Mode::Time)
            .chain(Mode::EDIT_RING)
            .find(|mode| mode.label() == s || mode.name() == s)
            .ok_or(ClockError::UnknownMode)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Mode {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}

/// Current screen plus the transition table
#[derive(Debug, Clone, Default)]
pub struct ModeStateMachine {
    mode: Mode,
}

impl ModeStateMachine {
    /// Start on the time screen
    pub const fn new() -> Self {
        Self { mode: Mode::Time }
    }

    /// Current screen
    pub fn current(&self) -> Mode {
        self.mode
    }

    /// Apply `trigger`; returns the new screen
    pub fn fire(&mut self, trigger: Trigger) -> Mode {
        let next = self.mode.next(trigger);
        if next != self.mode {
            clock_info!("Mode {} -> {} ({:?})", self.mode.name(), next.name(), trigger);
        }
        self.mode = next;
        next
    }

    /// Jump to a screen by caption or name; unknown names land on `Time`
    pub fn set_by_name(&mut self, name: &str) -> Mode {
        self.mode = name.parse().unwrap_or_else(|_| {
            clock_warn!("Unexpected mode {:?}, returning to time", name);
            Mode::Time
        });
        self.mode
    }
}
