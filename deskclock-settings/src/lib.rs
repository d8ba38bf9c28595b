//! Desk Clock Settings
//!
//! ## Overview
//!
//! Host-side half of the clock's configuration. The core only sees the
//! [`SettingsStore`](deskclock_core::traits::SettingsStore) trait; this crate
//! provides:
//!
//! - [`JsonSettingsStore`]: the settings file, a flat JSON object of text
//!   values keyed by setting name
//! - [`FIELDS`]: one [`FieldSpec`] per settings-page field
//! - [`apply_form`]: validates a submitted settings page and writes the
//!   accepted values back in one persist
//!
//! ## File Format
//!
//! ```json
//! {
//!   "alarm_on": "No",
//!   "alarm_hour": "6",
//!   "alarm_min": "30",
//!   "brightness": "50",
//!   "dst_mode": "auto_eu"
//! }
//! ```
//!
//! Every value is text, encoded the way
//! [`ClockConfig::encode`](deskclock_core::ClockConfig::encode) writes it.
//! Numbers and booleans written by hand are accepted and converted. Keys the
//! clock does not know are dropped on load.
//!
//! ## Usage Example
//!
//! ```no_run
//! use deskclock_settings::{apply_form, parse_form_body, JsonSettingsStore};
//!
//! let mut store = JsonSettingsStore::open("settings.json")?;
//!
//! let pairs = parse_form_body("alarm_on=Yes&alarm_hour=7&led_color=%2300ff00");
//! let outcome = apply_form(&mut store, &pairs)?;
//!
//! for key in &outcome.changed {
//!     println!("changed: {}", key.name());
//! }
//! // then call ClockCore::update_display_state()
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

use deskclock_core::SettingKey;

pub mod fields;
pub mod form;
pub mod store;

pub use fields::{FieldKind, FieldSpec, FIELDS};
pub use form::{apply_form, parse_form_body, FormError, FormOutcome};
pub use store::JsonSettingsStore;

/// Default text of every setting, in [`SettingKey::ALL`] order
pub const DEFAULTS: [(SettingKey, &str); 15] = [
    (SettingKey::AlarmOn, "No"),
    (SettingKey::AlarmHour, "6"),
    (SettingKey::AlarmMinute, "30"),
    (SettingKey::ActiveFont, "nixie"),
    (SettingKey::FontColor, "#ff7b00"),
    (SettingKey::Brightness, "50"),
    (SettingKey::LedColor, "#ff7b00"),
    (SettingKey::LedAlarmColor, "#cccccc"),
    (SettingKey::LedMode, "0"),
    (SettingKey::TwentyFourHour, "24"),
    (SettingKey::ShowSeconds, "No"),
    (SettingKey::ShowDate, "No"),
    (SettingKey::UtcOffset, "0"),
    (SettingKey::DstMode, "auto_eu"),
    (SettingKey::AdjustTiming, "128"),
];

/// Default text for one key
pub fn default_value(key: SettingKey) -> &'static str {
    DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, value)| *value)
        .unwrap_or_default()
}

/// Settings file errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum SettingsError {
    /// The file could not be read or written
    #[error("Settings file {path}: {message}")]
    Io {
        /// File path
        path: String,
        /// OS error text
        message: String,
    },

    /// The in-memory table could not be encoded
    #[error("Failed to encode settings: {0}")]
    Encode(String),
}
