//! Desk clock control core
//!
//! Keeps a desk clock's time, alarm and display in step with three buttons
//! and a settings page. Platform-agnostic: every peripheral sits behind a
//! trait, so the same core runs on the clock's microcontroller and in a
//! host-side simulation.
//!
//! Key constraints:
//! - No heap allocation, `no_std` without the `std` feature
//! - Single cooperative loop; the 1 Hz interrupt only sets a flag
//! - Every blocking wait is bounded (sync retries, edit timeout, alarm chirp)
//!
//! ## Components
//!
//! - [`button`]: debounce and short/long press classification
//! - [`sync`]: network time sync with retry and DST rules
//! - [`alarm`]: trigger at `hh:mm:00`, auto-expiry on the next minute
//! - [`display`]: minimal-diff digit updates
//! - [`mode`]: time screen and the ring of edit screens
//! - [`clock`]: the service loop tying them together
//!
//! ```no_run
//! use deskclock_core::{AlarmEngine, AlarmStatus};
//!
//! let mut alarm = AlarmEngine::new(true, 6, 30);
//!
//! assert_eq!(alarm.check(6, 30, 0), AlarmStatus::Triggered);
//! assert_eq!(alarm.check(6, 31, 0), AlarmStatus::Expired);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod macros;

pub mod alarm;
pub mod button;
pub mod clock;
pub mod config;
pub mod constants;
pub mod display;
pub mod errors;
pub mod mode;
pub mod store;
pub mod sync;
pub mod tick;
pub mod time;
pub mod traits;

// Public API
pub use alarm::{AlarmEngine, AlarmStatus};
pub use button::{ButtonConfig, ButtonDebouncer, ButtonEvent, ButtonId, Polarity, Press};
pub use clock::{Board, ClockCore, ClockCoreBuilder, ServiceReport};
pub use config::{ClockConfig, SettingKey, ValueRange};
pub use display::{DisplayFormat, DisplayReconciler};
pub use errors::{ClockError, ClockResult, ConfigError, NetworkError, StoreError, SyncError};
pub use mode::{Mode, ModeStateMachine};
pub use store::MemoryStore;
pub use sync::{DstMode, DstRegion, TimeSyncManager};
pub use tick::TickFlag;
pub use time::{TimeOfDay, Timestamp, WallClock};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
