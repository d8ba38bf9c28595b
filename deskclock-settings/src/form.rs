//! Settings page submissions
//!
//! The page posts an `application/x-www-form-urlencoded` body. Each pair is
//! checked against its [`FieldSpec`]; bad pairs are reported and skipped,
//! good ones are written and the store is persisted once at the end.
//!
//! The page's "as font" checkbox (`asFont=on`) copies the font color onto the
//! LED strip color.

use deskclock_core::traits::SettingsStore;
use deskclock_core::{SettingKey, StoreError};
use log::{debug, warn};

use crate::fields::{FieldSpec, Normalized};

/// Checkbox that copies the font color to the LED strip
const AS_FONT_FIELD: &str = "asFont";

/// A submitted pair that was not applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror_no_std::Error)]
pub enum FormError {
    /// No field with this name
    #[error("Unknown field {0:?}")]
    UnknownField(String),

    /// The value does not fit the field
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Field name
        key: &'static str,
        /// Value as submitted
        value: String,
    },

    /// The store refused the value
    #[error("Store rejected {key}: {reason}")]
    Rejected {
        /// Field name
        key: &'static str,
        /// Store error
        reason: StoreError,
    },
}

/// What [`apply_form`] did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    /// Settings whose stored text changed
    pub changed: Vec<SettingKey>,
    /// Numbers pulled into range
    pub clamped: Vec<SettingKey>,
    /// Pairs that were skipped
    pub errors: Vec<FormError>,
}

impl FormOutcome {
    /// Whether anything was written
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Split a urlencoded body into decoded pairs
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Validate and write a settings page submission
///
/// Persists once if anything changed. The `Err` case is a failed persist;
/// the in-memory values are already updated by then.
pub fn apply_form<S, K, V>(store: &mut S, pairs: &[(K, V)]) -> Result<FormOutcome, StoreError>
where
    S: SettingsStore,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut outcome = FormOutcome::default();
    let mut as_font = false;

    for (name, raw) in pairs {
        let (name, raw) = (name.as_ref(), raw.as_ref());
        if name == AS_FONT_FIELD {
            as_font = raw == "on";
            continue;
        }

        let Some(field) = FieldSpec::find(name) else {
            warn!("Ignoring unknown form field {:?}", name);
            outcome.errors.push(FormError::UnknownField(name.to_string()));
            continue;
        };
        let key = field.key;

        let Some(normalized) = field.normalize(raw) else {
            warn!("Invalid value {:?} for {}", raw, key.name());
            outcome.errors.push(FormError::InvalidValue { key: key.name(), value: raw.to_string() });
            continue;
        };
        if let Normalized::Clamped(_) = normalized {
            warn!("{} value {:?} clamped to {}", key.name(), raw, normalized.text());
            outcome.clamped.push(key);
        }

        write_if_changed(store, key, normalized.text(), &mut outcome);
    }

    if as_font {
        if let Some(color) = store.get(SettingKey::FontColor.name()) {
            write_if_changed(store, SettingKey::LedColor, &color, &mut outcome);
        }
    }

    if outcome.has_changes() {
        store.persist()?;
        debug!("Settings page changed {} value(s)", outcome.changed.len());
    }
    Ok(outcome)
}

fn write_if_changed<S: SettingsStore>(store: &mut S, key: SettingKey, text: &str, outcome: &mut FormOutcome) {
    if store.get(key.name()).as_deref() == Some(text) {
        return;
    }
    match store.set(key.name(), text) {
        Ok(()) => {
            if !outcome.changed.contains(&key) {
                outcome.changed.push(key);
            }
        }
        Err(reason) => outcome.errors.push(FormError::Rejected { key: key.name(), reason }),
    }
}
