//! Typed Clock Configuration
//!
//! The settings store holds text under string keys; the core works with
//! [`ClockConfig`]. [`SettingKey`] is the closed set of keys and the only
//! place key names and value encodings are spelled out.
//!
//! ## Value Encodings
//!
//! | Key | Text | Range |
//! |-----|------|-------|
//! | `alarm_on`, `show_secs`, `show_date` | `Yes` / `No` | |
//! | `24_hour` | `24` / `12` | |
//! | `alarm_hour` | integer | 0-23 |
//! | `alarm_min` | integer | 0-59 |
//! | `brightness` | integer percent | 10-100, step 10 |
//! | `led_mode` | integer | 0-10 |
//! | `utc_offset` | integer hours | -12 to 12 |
//! | `adjust_timing` | integer | 0-255 |
//! | `active_font` | `nixie` / `dot` / `7seg` | |
//! | `font_color`, `led_color`, `led_alarm_color` | `#rrggbb` | |
//! | `dst_mode` | `dst_off` / `dst_on` / `auto_eu` / `auto_na` | |
//!
//! Loading never fails: out-of-range numbers are clamped, unparsable or
//! missing values keep their defaults, and each correction is logged.

use core::fmt::Write;

use crate::errors::{ConfigError, StoreError};
use crate::macros::{clock_debug, clock_warn};
use crate::sync::DstMode;
use crate::traits::{Font, Rgb, SettingText, SettingsStore};

/// Inclusive integer range with a step, wrapping at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    /// Smallest value
    pub min: i32,
    /// Largest value
    pub max: i32,
    /// Increment per button press
    pub step: i32,
}

impl ValueRange {
    /// Range with step 1
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max, step: 1 }
    }

    /// Range with a custom step
    pub const fn stepped(min: i32, max: i32, step: i32) -> Self {
        Self { min, max, step }
    }

    /// Whether `value` lies inside
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Nearest value inside
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// One step up; past the maximum wraps to the minimum
    pub fn next(&self, value: i32) -> i32 {
        let up = self.clamp(value).saturating_add(self.step);
        if up > self.max {
            self.min
        } else {
            up
        }
    }

    /// One step down; past the minimum wraps to the maximum
    pub fn prev(&self, value: i32) -> i32 {
        let down = self.clamp(value).saturating_sub(self.step);
        if down < self.min {
            self.max
        } else {
            down
        }
    }
}

const FLAG: ValueRange = ValueRange::new(0, 1);

/// Every persisted setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Alarm armed
    AlarmOn,
    /// Alarm hour
    AlarmHour,
    /// Alarm minute
    AlarmMinute,
    /// Digit style
    ActiveFont,
    /// Digit color
    FontColor,
    /// Backlight percent
    Brightness,
    /// LED strip color
    LedColor,
    /// LED strip color while the alarm rings
    LedAlarmColor,
    /// LED strip animation
    LedMode,
    /// 24-hour display
    TwentyFourHour,
    /// 6-digit layout with seconds
    ShowSeconds,
    /// Date instead of alarm status in the auxiliary line
    ShowDate,
    /// Hours from UTC
    UtcOffset,
    /// Daylight saving rule
    DstMode,
    /// RTC oscillator trim
    AdjustTiming,
}

impl SettingKey {
    /// All keys, in settings-page order
    pub const ALL: [SettingKey; 15] = [
        SettingKey::AlarmOn,
        SettingKey::AlarmHour,
        SettingKey::AlarmMinute,
        SettingKey::ActiveFont,
        SettingKey::FontColor,
        SettingKey::Brightness,
        SettingKey::LedColor,
        SettingKey::LedAlarmColor,
        SettingKey::LedMode,
        SettingKey::TwentyFourHour,
        SettingKey::ShowSeconds,
        SettingKey::ShowDate,
        SettingKey::UtcOffset,
        SettingKey::DstMode,
        SettingKey::AdjustTiming,
    ];

    /// Key in the store
    pub const fn name(self) -> &'static str {
        match self {
            SettingKey::AlarmOn => "alarm_on",
            SettingKey::AlarmHour => "alarm_hour",
            SettingKey::AlarmMinute => "alarm_min",
            SettingKey::ActiveFont => "active_font",
            SettingKey::FontColor => "font_color",
            SettingKey::Brightness => "brightness",
            SettingKey::LedColor => "led_color",
            SettingKey::LedAlarmColor => "led_alarm_color",
            SettingKey::LedMode => "led_mode",
            SettingKey::TwentyFourHour => "24_hour",
            SettingKey::ShowSeconds => "show_secs",
            SettingKey::ShowDate => "show_date",
            SettingKey::UtcOffset => "utc_offset",
            SettingKey::DstMode => "dst_mode",
            SettingKey::AdjustTiming => "adjust_timing",
        }
    }

    /// Look up a store key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Numeric range, for keys edited with the buttons or a number field
    ///
    /// Yes/no and 12/24 keys count as the range 0-1.
    pub const fn range(self) -> Option<ValueRange> {
        match self {
            SettingKey::AlarmOn
            | SettingKey::TwentyFourHour
            | SettingKey::ShowSeconds
            | SettingKey::ShowDate => Some(FLAG),
            SettingKey::AlarmHour => Some(ValueRange::new(0, 23)),
            SettingKey::AlarmMinute => Some(ValueRange::new(0, 59)),
            SettingKey::Brightness => Some(ValueRange::stepped(10, 100, 10)),
            SettingKey::LedMode => Some(ValueRange::new(0, 10)),
            SettingKey::UtcOffset => Some(ValueRange::new(-12, 12)),
            SettingKey::AdjustTiming => Some(ValueRange::new(0, 255)),
            SettingKey::ActiveFont
            | SettingKey::FontColor
            | SettingKey::LedColor
            | SettingKey::LedAlarmColor
            | SettingKey::DstMode => None,
        }
    }
}

/// Typed view of every setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Alarm armed
    pub alarm_enabled: bool,
    /// 0-23
    pub alarm_hour: u8,
    /// 0-59
    pub alarm_minute: u8,
    /// Digit style
    pub font: Font,
    /// Digit color
    pub font_color: Rgb,
    /// Backlight percent
    pub brightness: u8,
    /// LED strip color
    pub led_color: Rgb,
    /// LED strip color while ringing
    pub led_alarm_color: Rgb,
    /// LED strip animation
    pub led_mode: u8,
    /// 24-hour display
    pub twenty_four_hour: bool,
    /// 6-digit layout
    pub show_seconds: bool,
    /// Date in the auxiliary line
    pub show_date: bool,
    /// Hours from UTC, -12 to 12
    pub utc_offset_hours: i8,
    /// Daylight saving rule
    pub dst_mode: DstMode,
    /// RTC oscillator trim, 128 neutral
    pub rtc_trim: u8,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            alarm_enabled: false,
            alarm_hour: 6,
            alarm_minute: 30,
            font: Font::Nixie,
            font_color: Rgb::new(0xff, 0x7b, 0x00),
            brightness: 50,
            led_color: Rgb::new(0xff, 0x7b, 0x00),
            led_alarm_color: Rgb::new(0xcc, 0xcc, 0xcc),
            led_mode: 0,
            twenty_four_hour: true,
            show_seconds: false,
            show_date: false,
            utc_offset_hours: 0,
            dst_mode: DstMode::AutoEu,
            rtc_trim: 128,
        }
    }
}

impl ClockConfig {
    /// Read every key from `store`, correcting what cannot be used
    pub fn load<S: SettingsStore>(store: &S) -> Self {
        let mut config = Self::default();
        for key in SettingKey::ALL {
            let Some(text) = store.get(key.name()) else {
                clock_debug!("setting {} missing, using default", key.name());
                continue;
            };
            match config.apply_text(key, &text) {
                Ok(()) => {}
                Err(_e @ ConfigError::OutOfRange { .. }) => clock_warn!("{}, clamped", _e),
                Err(_e) => clock_warn!("{}, keeping default", _e),
            }
        }
        config
    }

    /// Set one field from its stored text
    ///
    /// Out-of-range numbers are clamped into range and still reported as
    /// [`ConfigError::OutOfRange`]. Anything else that does not parse leaves
    /// the field unchanged.
    pub fn apply_text(&mut self, key: SettingKey, text: &str) -> Result<(), ConfigError> {
        let unparsable = ConfigError::Unparsable { key: key.name() };
        match key {
            SettingKey::AlarmOn => self.alarm_enabled = parse_yes_no(text).ok_or(unparsable)?,
            SettingKey::ShowSeconds => self.show_seconds = parse_yes_no(text).ok_or(unparsable)?,
            SettingKey::ShowDate => self.show_date = parse_yes_no(text).ok_or(unparsable)?,
            SettingKey::TwentyFourHour => {
                self.twenty_four_hour = match text.trim() {
                    "24" => true,
                    "12" => false,
                    _ => return Err(unparsable),
                }
            }
            SettingKey::ActiveFont => self.font = Font::from_name(text.trim()).ok_or(unparsable)?,
            SettingKey::FontColor => self.font_color = text.trim().parse().map_err(|_| unparsable)?,
            SettingKey::LedColor => self.led_color = text.trim().parse().map_err(|_| unparsable)?,
            SettingKey::LedAlarmColor => {
                self.led_alarm_color = text.trim().parse().map_err(|_| unparsable)?
            }
            SettingKey::DstMode => {
                self.dst_mode = DstMode::from_name(text.trim()).ok_or(unparsable)?
            }
            SettingKey::AlarmHour
            | SettingKey::AlarmMinute
            | SettingKey::Brightness
            | SettingKey::LedMode
            | SettingKey::UtcOffset
            | SettingKey::AdjustTiming => {
                let value: i32 = text.trim().parse().map_err(|_| unparsable)?;
                let clamped = self.set_numeric(key, value).ok_or(unparsable)?;
                if clamped != value {
                    let range = key.range().unwrap_or(FLAG);
                    return Err(ConfigError::OutOfRange {
                        key: key.name(),
                        value,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }
        Ok(())
    }

    /// Stored text of one field
    pub fn encode(&self, key: SettingKey) -> SettingText {
        let mut text = SettingText::new();
        // every encoding fits the text buffer
        let _ = match key {
            SettingKey::AlarmOn => text.write_str(yes_no(self.alarm_enabled)),
            SettingKey::ShowSeconds => text.write_str(yes_no(self.show_seconds)),
            SettingKey::ShowDate => text.write_str(yes_no(self.show_date)),
            SettingKey::TwentyFourHour => {
                text.write_str(if self.twenty_four_hour { "24" } else { "12" })
            }
            SettingKey::ActiveFont => text.write_str(self.font.name()),
            SettingKey::FontColor => text.write_str(&self.font_color.to_hex()),
            SettingKey::LedColor => text.write_str(&self.led_color.to_hex()),
            SettingKey::LedAlarmColor => text.write_str(&self.led_alarm_color.to_hex()),
            SettingKey::DstMode => text.write_str(self.dst_mode.name()),
            SettingKey::AlarmHour
            | SettingKey::AlarmMinute
            | SettingKey::Brightness
            | SettingKey::LedMode
            | SettingKey::UtcOffset
            | SettingKey::AdjustTiming => write!(text, "{}", self.numeric(key).unwrap_or_default()),
        };
        text
    }

    /// Numeric value of a key with a [`range`](SettingKey::range)
    pub fn numeric(&self, key: SettingKey) -> Option<i32> {
        let value = match key {
            SettingKey::AlarmOn => i32::from(self.alarm_enabled),
            SettingKey::TwentyFourHour => i32::from(self.twenty_four_hour),
            SettingKey::ShowSeconds => i32::from(self.show_seconds),
            SettingKey::ShowDate => i32::from(self.show_date),
            SettingKey::AlarmHour => i32::from(self.alarm_hour),
            SettingKey::AlarmMinute => i32::from(self.alarm_minute),
            SettingKey::Brightness => i32::from(self.brightness),
            SettingKey::LedMode => i32::from(self.led_mode),
            SettingKey::UtcOffset => i32::from(self.utc_offset_hours),
            SettingKey::AdjustTiming => i32::from(self.rtc_trim),
            SettingKey::ActiveFont
            | SettingKey::FontColor
            | SettingKey::LedColor
            | SettingKey::LedAlarmColor
            | SettingKey::DstMode => return None,
        };
        Some(value)
    }

    /// Set a numeric key, clamped into its range; returns the stored value
    pub fn set_numeric(&mut self, key: SettingKey, value: i32) -> Option<i32> {
        let v = key.range()?.clamp(value);
        // clamped values fit the field types
        match key {
            SettingKey::AlarmOn => self.alarm_enabled = v != 0,
            SettingKey::TwentyFourHour => self.twenty_four_hour = v != 0,
            SettingKey::ShowSeconds => self.show_seconds = v != 0,
            SettingKey::ShowDate => self.show_date = v != 0,
            SettingKey::AlarmHour => self.alarm_hour = v as u8,
            SettingKey::AlarmMinute => self.alarm_minute = v as u8,
            SettingKey::Brightness => self.brightness = v as u8,
            SettingKey::LedMode => self.led_mode = v as u8,
            SettingKey::UtcOffset => self.utc_offset_hours = v as i8,
            SettingKey::AdjustTiming => self.rtc_trim = v as u8,
            SettingKey::ActiveFont
            | SettingKey::FontColor
            | SettingKey::LedColor
            | SettingKey::LedAlarmColor
            | SettingKey::DstMode => return None,
        }
        Some(v)
    }

    /// Write one field and persist
    pub fn save<S: SettingsStore>(&self, key: SettingKey, store: &mut S) -> Result<(), StoreError> {
        store.set(key.name(), &self.encode(key))?;
        store.persist()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn parse_yes_no(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if text.eq_ignore_ascii_case("no") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn range_wraps_both_ways() {
        let minutes = ValueRange::new(0, 59);
        assert_eq!(minutes.next(58), 59);
        assert_eq!(minutes.next(59), 0);
        assert_eq!(minutes.prev(0), 59);

        let brightness = ValueRange::stepped(10, 100, 10);
        assert_eq!(brightness.next(100), 10);
        assert_eq!(brightness.prev(10), 100);
        assert_eq!(brightness.next(50), 60);
    }

    #[test]
    fn range_clamps_before_stepping() {
        let hours = ValueRange::new(0, 23);
        assert_eq!(hours.next(40), 0);
        assert_eq!(hours.prev(-5), 23);
        assert!(!hours.contains(24));
    }

    #[test]
    fn key_names_unique_and_round_trip() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_name(key.name()), Some(key));
        }
        assert_eq!(SettingKey::from_name("backlight"), None);
    }

    #[test]
    fn defaults_encode_as_stored_text() {
        let config = ClockConfig::default();
        assert_eq!(config.encode(SettingKey::AlarmOn).as_str(), "No");
        assert_eq!(config.encode(SettingKey::AlarmHour).as_str(), "6");
        assert_eq!(config.encode(SettingKey::LedAlarmColor).as_str(), "#cccccc");
        assert_eq!(config.encode(SettingKey::TwentyFourHour).as_str(), "24");
        assert_eq!(config.encode(SettingKey::DstMode).as_str(), "auto_eu");
        assert_eq!(config.encode(SettingKey::AdjustTiming).as_str(), "128");
    }

    #[test]
    fn encode_then_apply_restores_every_field() {
        let config = ClockConfig {
            alarm_enabled: true,
            alarm_hour: 7,
            font: Font::SevenSegment,
            led_color: Rgb::new(1, 2, 3),
            twenty_four_hour: false,
            utc_offset_hours: -5,
            dst_mode: DstMode::AutoNa,
            ..ClockConfig::default()
        };
        let mut copy = ClockConfig::default();
        for key in SettingKey::ALL {
            copy.apply_text(key, &config.encode(key)).unwrap();
        }
        assert_eq!(copy, config);
    }

    #[test]
    fn load_clamps_and_falls_back() {
        let mut store = MemoryStore::new();
        store.set("alarm_hour", "27").unwrap();
        store.set("utc_offset", "-15").unwrap();
        store.set("brightness", "loud").unwrap();
        store.set("led_color", "orange").unwrap();
        store.set("show_secs", "Yes").unwrap();

        let config = ClockConfig::load(&store);
        assert_eq!(config.alarm_hour, 23);
        assert_eq!(config.utc_offset_hours, -12);
        assert_eq!(config.brightness, 50);
        assert_eq!(config.led_color, ClockConfig::default().led_color);
        assert!(config.show_seconds);
        assert_eq!(config.alarm_minute, 30);
    }

    #[test]
    fn apply_reports_out_of_range() {
        let mut config = ClockConfig::default();
        assert_eq!(
            config.apply_text(SettingKey::AlarmMinute, "75"),
            Err(ConfigError::OutOfRange { key: "alarm_min", value: 75, min: 0, max: 59 })
        );
        assert_eq!(config.alarm_minute, 59);
        assert_eq!(
            config.apply_text(SettingKey::ActiveFont, "comic"),
            Err(ConfigError::Unparsable { key: "active_font" })
        );
    }

    #[test]
    fn numeric_view_of_flags() {
        let mut config = ClockConfig::default();
        assert_eq!(config.numeric(SettingKey::TwentyFourHour), Some(1));
        assert_eq!(config.set_numeric(SettingKey::TwentyFourHour, 0), Some(0));
        assert!(!config.twenty_four_hour);
        assert_eq!(config.numeric(SettingKey::LedColor), None);
        assert_eq!(config.set_numeric(SettingKey::AdjustTiming, 300), Some(255));
    }

    #[test]
    fn save_persists_one_key() {
        let mut store = MemoryStore::new();
        let config = ClockConfig { brightness: 80, ..ClockConfig::default() };

        config.save(SettingKey::Brightness, &mut store).unwrap();
        assert_eq!(store.get("brightness").unwrap().as_str(), "80");
        assert_eq!(store.persist_count(), 1);
        assert_eq!(store.get("alarm_on"), None);
    }
}
