//! Settings Store
//!
//! Settings live as short text values under string keys, the format the
//! settings page and the on-flash file share. Typing happens one layer up in
//! [`ClockConfig`](crate::config::ClockConfig).

use heapless::String;

use crate::constants::display::MAX_TEXT_LEN;
use crate::errors::StoreError;

/// A stored setting value
pub type SettingText = String<MAX_TEXT_LEN>;

/// String-keyed settings persistence
///
/// Durability is best effort: `persist` writes then reads back, and a
/// failure is reported but the in-memory value stays current.
pub trait SettingsStore {
    /// Current value of `key`
    fn get(&self, key: &str) -> Option<SettingText>;

    /// Update `key` in memory
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Flush all values to the backing medium
    fn persist(&mut self) -> Result<(), StoreError>;
}
