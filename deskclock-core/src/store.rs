//! In-Memory Settings Store
//!
//! Fixed-capacity key/value table for boards without a filesystem and for
//! tests. `persist` is a no-op apart from counting calls.

use heapless::{String, Vec};

use crate::config::{ClockConfig, SettingKey};
use crate::errors::StoreError;
use crate::traits::{SettingText, SettingsStore};

/// Longest key name
pub const MAX_KEY_LEN: usize = 16;

/// Number of entries the store holds
pub const MAX_ENTRIES: usize = 24;

type Key = String<MAX_KEY_LEN>;

/// Heap-free settings table
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<(Key, SettingText), MAX_ENTRIES>,
    persist_count: u32,
}

impl MemoryStore {
    /// Empty store
    pub const fn new() -> Self {
        Self { entries: Vec::new(), persist_count: 0 }
    }

    /// Store holding the default value of every setting
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        let defaults = ClockConfig::default();
        for key in SettingKey::ALL {
            // capacity and key lengths cover every setting
            let _ = store.set(key.name(), &defaults.encode(key));
        }
        store
    }

    /// Number of `persist` calls so far
    pub fn persist_count(&self) -> u32 {
        self.persist_count
    }

    /// Stored entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<SettingText> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.clone())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if SettingKey::from_name(key).is_none() {
            return Err(StoreError::UnknownKey);
        }
        let value = SettingText::try_from(value).map_err(|_| StoreError::ValueTooLong)?;
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| k.as_str() == key) {
            *slot = value;
            return Ok(());
        }
        let key = Key::try_from(key).map_err(|_| StoreError::UnknownKey)?;
        self.entries.push((key, value)).map_err(|_| StoreError::Full)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.persist_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut store = MemoryStore::new();
        store.set("brightness", "70").unwrap();
        store.set("brightness", "80").unwrap();

        assert_eq!(store.get("brightness").unwrap().as_str(), "80");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("led_mode"), None);
    }

    #[test]
    fn defaults_cover_every_key() {
        let store = MemoryStore::with_defaults();
        assert_eq!(store.len(), SettingKey::ALL.len());
        assert_eq!(ClockConfig::load(&store), ClockConfig::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let mut store = MemoryStore::new();
        assert_eq!(store.set("snooze", "5"), Err(StoreError::UnknownKey));
        assert!(store.is_empty());
    }

    #[test]
    fn oversized_values_rejected() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.set("led_color", "#ff7b00#ff7b00#ff7b00#ff7b00"),
            Err(StoreError::ValueTooLong)
        );
        assert_eq!(
            store.set("a_key_longer_than_sixteen", "1"),
            Err(StoreError::UnknownKey)
        );
    }

    #[test]
    fn persist_counts() {
        let mut store = MemoryStore::new();
        store.persist().unwrap();
        store.persist().unwrap();
        assert_eq!(store.persist_count(), 2);
    }
}
