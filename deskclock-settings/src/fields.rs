//! Settings page fields
//!
//! One [`FieldSpec`] per setting the page can submit. The kind decides how a
//! submitted value is checked and normalized before it reaches the store.

use deskclock_core::traits::{Font, Rgb};
use deskclock_core::{DstMode, SettingKey, ValueRange};

/// How a field is entered and validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer text box, clamped into the key's range
    Number,
    /// `Yes` / `No` radio buttons
    YesNo,
    /// `12` / `24` radio buttons
    HourFormat,
    /// Font radio buttons
    Font,
    /// Color picker
    Color,
    /// DST dropdown
    Dst,
}

/// A settings page field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Setting written by the field
    pub key: SettingKey,
    /// Caption on the page
    pub label: &'static str,
    /// Input kind
    pub kind: FieldKind,
}

/// Result of normalizing one submitted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Accepted as stored text
    Accepted(String),
    /// A number outside the range, pulled to the nearest bound
    Clamped(String),
}

impl Normalized {
    /// Text to store
    pub fn text(&self) -> &str {
        match self {
            Normalized::Accepted(text) | Normalized::Clamped(text) => text,
        }
    }
}

impl FieldSpec {
    const fn new(key: SettingKey, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }

    /// Look up the field for a submitted name
    pub fn find(name: &str) -> Option<&'static FieldSpec> {
        FIELDS.iter().find(|field| field.key.name() == name)
    }

    /// Allowed range of a [`FieldKind::Number`] field
    pub fn range(&self) -> Option<ValueRange> {
        match self.kind {
            FieldKind::Number => self.key.range(),
            _ => None,
        }
    }

    /// Check `raw` and convert it to the stored encoding
    ///
    /// Returns `None` when the value cannot be used at all.
    pub fn normalize(&self, raw: &str) -> Option<Normalized> {
        let raw = raw.trim();
        let text = match self.kind {
            FieldKind::Number => {
                let value: i32 = raw.parse().ok()?;
                let clamped = self.range()?.clamp(value);
                if clamped != value {
                    return Some(Normalized::Clamped(clamped.to_string()));
                }
                clamped.to_string()
            }
            FieldKind::YesNo => {
                if raw.eq_ignore_ascii_case("yes") {
                    "Yes".to_string()
                } else if raw.eq_ignore_ascii_case("no") {
                    "No".to_string()
                } else {
                    return None;
                }
            }
            FieldKind::HourFormat => match raw {
                "12" | "24" => raw.to_string(),
                _ => return None,
            },
            FieldKind::Font => Font::from_name(raw)?.name().to_string(),
            FieldKind::Color => raw.parse::<Rgb>().ok()?.to_hex().to_string(),
            FieldKind::Dst => DstMode::from_name(raw)?.name().to_string(),
        };
        Some(Normalized::Accepted(text))
    }
}

/// Every field, in page order
pub const FIELDS: [FieldSpec; 15] = [
    FieldSpec::new(SettingKey::AlarmOn, "Alarm Enabled", FieldKind::YesNo),
    FieldSpec::new(SettingKey::AlarmHour, "Alarm hour", FieldKind::Number),
    FieldSpec::new(SettingKey::AlarmMinute, "Alarm minute", FieldKind::Number),
    FieldSpec::new(SettingKey::ActiveFont, "Font", FieldKind::Font),
    FieldSpec::new(SettingKey::FontColor, "Font colour", FieldKind::Color),
    FieldSpec::new(SettingKey::Brightness, "Brightness %", FieldKind::Number),
    FieldSpec::new(SettingKey::LedColor, "LED color", FieldKind::Color),
    FieldSpec::new(SettingKey::LedAlarmColor, "LED alarm color", FieldKind::Color),
    FieldSpec::new(SettingKey::LedMode, "LED mode", FieldKind::Number),
    FieldSpec::new(SettingKey::TwentyFourHour, "Hours Format", FieldKind::HourFormat),
    FieldSpec::new(SettingKey::ShowSeconds, "Show Seconds", FieldKind::YesNo),
    FieldSpec::new(SettingKey::ShowDate, "Show Date", FieldKind::YesNo),
    FieldSpec::new(SettingKey::UtcOffset, "Offset from UTC", FieldKind::Number),
    FieldSpec::new(SettingKey::DstMode, "DST Mode", FieldKind::Dst),
    FieldSpec::new(SettingKey::AdjustTiming, "Trim timing", FieldKind::Number),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_one_field() {
        for key in SettingKey::ALL {
            assert_eq!(FIELDS.iter().filter(|f| f.key == key).count(), 1, "{}", key.name());
        }
    }

    #[test]
    fn number_fields_have_ranges() {
        for field in FIELDS.iter().filter(|f| f.kind == FieldKind::Number) {
            assert!(field.range().is_some(), "{}", field.label);
        }
    }

    #[test]
    fn numbers_are_clamped() {
        let hour = FieldSpec::find("alarm_hour").unwrap();
        assert_eq!(hour.normalize("7"), Some(Normalized::Accepted("7".into())));
        assert_eq!(hour.normalize(" 30 "), Some(Normalized::Clamped("23".into())));
        assert_eq!(hour.normalize("seven"), None);

        let offset = FieldSpec::find("utc_offset").unwrap();
        assert_eq!(offset.normalize("-14"), Some(Normalized::Clamped("-12".into())));
    }

    #[test]
    fn choices_are_checked() {
        let alarm = FieldSpec::find("alarm_on").unwrap();
        assert_eq!(alarm.normalize("yes").unwrap().text(), "Yes");
        assert_eq!(alarm.normalize("maybe"), None);

        let format = FieldSpec::find("24_hour").unwrap();
        assert_eq!(format.normalize("12").unwrap().text(), "12");
        assert_eq!(format.normalize("13"), None);

        let font = FieldSpec::find("active_font").unwrap();
        assert_eq!(font.normalize("7seg").unwrap().text(), "7seg");
        assert_eq!(font.normalize("comic"), None);

        let dst = FieldSpec::find("dst_mode").unwrap();
        assert_eq!(dst.normalize("auto_na").unwrap().text(), "auto_na");
        assert_eq!(dst.normalize("auto_au"), None);
    }

    #[test]
    fn colors_are_normalized() {
        let color = FieldSpec::find("led_color").unwrap();
        assert_eq!(color.normalize("%2300FF00").unwrap().text(), "#00ff00");
        assert_eq!(color.normalize("#12345"), None);
    }

    #[test]
    fn unknown_field() {
        assert!(FieldSpec::find("volume").is_none());
    }
}
