//! JSON Settings File
//!
//! [`JsonSettingsStore`] keeps the whole table in memory. `set` only touches
//! memory; `persist` rewrites the file and reads it back to confirm the
//! write landed.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use deskclock_core::constants::MAX_TEXT_LEN;
use deskclock_core::traits::{SettingText, SettingsStore};
use deskclock_core::{SettingKey, StoreError};
use log::{info, warn};
use serde::Deserialize;

use crate::{SettingsError, DEFAULTS};

/// A value as found in the file
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl StoredValue {
    fn into_text(self) -> String {
        match self {
            StoredValue::Text(text) => text,
            StoredValue::Number(n) => n.to_string(),
            StoredValue::Flag(true) => "Yes".to_string(),
            StoredValue::Flag(false) => "No".to_string(),
        }
    }
}

/// Settings backed by a JSON object file
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonSettingsStore {
    /// Load `path`
    ///
    /// A missing or unreadable-as-JSON file is replaced by the defaults,
    /// which are written back immediately. Settings missing from the file
    /// get their defaults; unknown keys are dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let mut store = Self { path, values: default_table() };

        let text = match fs::read_to_string(&store.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No settings file at {}, creating one", store.path.display());
                store.write_file()?;
                return Ok(store);
            }
            Err(e) => return Err(store.io_error(&e)),
        };

        match serde_json::from_str::<BTreeMap<String, StoredValue>>(&text) {
            Ok(found) => {
                for (key, value) in found {
                    if SettingKey::from_name(&key).is_none() {
                        warn!("Ignoring unknown setting {:?}", key);
                        continue;
                    }
                    store.values.insert(key, value.into_text());
                }
            }
            Err(e) => {
                warn!("Unable to load {}: {}. Creating new file", store.path.display(), e);
                store.write_file()?;
            }
        }
        Ok(store)
    }

    /// File this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every setting as `(key, text)`, sorted by key
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn encode(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(&self.values).map_err(|e| SettingsError::Encode(e.to_string()))
    }

    fn write_file(&self) -> Result<(), SettingsError> {
        let json = self.encode()?;
        fs::write(&self.path, json).map_err(|e| self.io_error(&e))
    }

    fn io_error(&self, e: &std::io::Error) -> SettingsError {
        SettingsError::Io { path: self.path.display().to_string(), message: e.to_string() }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<SettingText> {
        let value = self.values.get(key)?;
        SettingText::try_from(value.as_str()).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if SettingKey::from_name(key).is_none() {
            return Err(StoreError::UnknownKey);
        }
        if value.len() > MAX_TEXT_LEN {
            return Err(StoreError::ValueTooLong);
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        if let Err(e) = self.write_file() {
            warn!("{}", e);
            return Err(StoreError::WriteFailed);
        }

        let read_back = fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| serde_json::from_str::<BTreeMap<String, String>>(&text).ok());
        if read_back.as_ref() != Some(&self.values) {
            warn!("Settings file {} did not read back as written", self.path.display());
            return Err(StoreError::ReadBackMismatch);
        }
        Ok(())
    }
}

fn default_table() -> BTreeMap<String, String> {
    DEFAULTS.iter().map(|(key, value)| (key.name().to_string(), value.to_string())).collect()
}
