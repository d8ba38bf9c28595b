//! Error Types for the Clock Control Core
//!
//! ## Design Philosophy
//!
//! A desk clock has no operator watching a console, so nothing in the core is
//! allowed to be fatal. Errors exist to be logged and to pick the degraded
//! path: keep the last known good time, skip this tick's repaint, keep the
//! previous setting.
//!
//! Every error here is:
//!
//! 1. **Copy**: returned from the hot path and stored without moves.
//! 2. **Heap-free**: only `&'static str` and integers as payload.
//! 3. **Classified**: transient I/O (`NetworkError`, `StoreError`, RTC
//!    faults), invalid configuration (`ConfigError`) and sync exhaustion
//!    (`SyncError`).
//!
//! ## Handling Strategy
//!
//! ```rust
//! use deskclock_core::{errors::SyncError, ClockError};
//!
//! fn on_sync_result(result: Result<(), ClockError>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(ClockError::Sync(SyncError::RetriesExhausted { .. })) => {
//!             // Keep running on the RTC oscillator, retry next interval
//!         }
//!         Err(_) => {
//!             // Log and carry on
//!         }
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for core operations
pub type ClockResult<T> = Result<T, ClockError>;

/// Failures reported by the network time collaborator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// Station is not joined to a network
    #[error("Network not connected")]
    NotConnected,

    /// Time server could not be reached or resolved
    #[error("Time server unreachable")]
    Unreachable,

    /// No reply within the transport's deadline
    #[error("Time request timed out")]
    Timeout,

    /// Reply was malformed or from an unsynchronized server
    #[error("Invalid time server response")]
    InvalidResponse,
}

/// Failures reported by a settings store
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Key is not part of the settings table
    #[error("Unknown setting key")]
    UnknownKey,

    /// Value does not fit the store's fixed-size slot
    #[error("Setting value too long")]
    ValueTooLong,

    /// Store has no room for another entry
    #[error("Settings store full")]
    Full,

    /// Writing the backing medium failed
    #[error("Settings write failed")]
    WriteFailed,

    /// Reading back after a write did not match
    #[error("Settings read-back mismatch")]
    ReadBackMismatch,
}

/// A stored setting could not be used as-is
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Text could not be parsed for the setting's type
    #[error("Setting {key} has unparsable value")]
    Unparsable {
        /// The setting key
        key: &'static str,
    },

    /// Number outside the setting's range
    #[error("Setting {key} value {value} outside [{min}, {max}]")]
    OutOfRange {
        /// The setting key
        key: &'static str,
        /// The stored value
        value: i32,
        /// Smallest accepted value
        min: i32,
        /// Largest accepted value
        max: i32,
    },
}

/// Time synchronization failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// Every attempt in the retry budget failed
    #[error("Time sync failed after {attempts} attempts (last: {last})")]
    RetriesExhausted {
        /// Number of requests made
        attempts: u8,
        /// Error of the final attempt
        last: NetworkError,
    },

    /// Server time could not be mapped to a calendar date
    #[error("Timestamp {timestamp} not representable")]
    InvalidTimestamp {
        /// Offending seconds since the Unix epoch
        timestamp: i64,
    },
}

/// Umbrella error for the clock core
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// Network time source failure
    #[error("Network: {0}")]
    Network(#[from] NetworkError),

    /// Settings store failure
    #[error("Store: {0}")]
    Store(#[from] StoreError),

    /// Stored configuration value rejected
    #[error("Config: {0}")]
    Config(#[from] ConfigError),

    /// Synchronization failure
    #[error("Sync: {0}")]
    Sync(#[from] SyncError),

    /// RTC did not answer within the retry budget
    #[error("RTC unavailable")]
    RtcUnavailable,

    /// Mode name outside the closed set
    #[error("Unknown mode")]
    UnknownMode,

    /// Button slots full or button registered twice
    #[error("Button registration failed")]
    ButtonRegistration,
}

#[cfg(feature = "defmt")]
impl defmt::Format for NetworkError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotConnected => defmt::write!(fmt, "not connected"),
            Self::Unreachable => defmt::write!(fmt, "unreachable"),
            Self::Timeout => defmt::write!(fmt, "timeout"),
            Self::InvalidResponse => defmt::write!(fmt, "invalid response"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Network(e) => defmt::write!(fmt, "Network: {}", e),
            Self::Store(_) => defmt::write!(fmt, "Store error"),
            Self::Config(ConfigError::OutOfRange { key, value, min, max }) => {
                defmt::write!(fmt, "{} = {} outside [{}, {}]", key, value, min, max)
            }
            Self::Config(_) => defmt::write!(fmt, "Config error"),
            Self::Sync(SyncError::RetriesExhausted { attempts, last }) => {
                defmt::write!(fmt, "Sync failed after {} attempts: {}", attempts, last)
            }
            Self::Sync(SyncError::InvalidTimestamp { timestamp }) => {
                defmt::write!(fmt, "Bad timestamp {}", timestamp)
            }
            Self::RtcUnavailable => defmt::write!(fmt, "RTC unavailable"),
            Self::UnknownMode => defmt::write!(fmt, "Unknown mode"),
            Self::ButtonRegistration => defmt::write!(fmt, "Button registration failed"),
        }
    }
}
