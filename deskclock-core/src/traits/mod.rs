//! Collaborator Traits for the Clock Control Core
//!
//! The core never touches hardware directly. Everything it drives or reads
//! sits behind one of these traits, so the same core runs on the clock's
//! microcontroller and inside a host-side simulation.
//!
//! ## Module Organization
//!
//! - [`time`] - monotonic time, the RTC chip and the network time source
//! - [`output`] - digit display and LED/buzzer actuators
//! - [`store`] - string-keyed settings store
//!
//! Buttons and sleeps use `embedded-hal` 1.0 directly
//! ([`embedded_hal::digital::InputPin`], [`embedded_hal::delay::DelayNs`]).
//!
//! ## Design Philosophy
//!
//! - **Static Dispatch**: the core is generic over every collaborator; no
//!   trait objects on the hot path
//! - **Explicit Context**: collaborators are borrowed per call through a
//!   [`Board`](crate::clock::Board), never stored in globals
//! - **Fallible Where Hardware Is**: buses (RTC, display, storage, network)
//!   return `Result`; the LED strip and buzzer are fire-and-forget

pub mod output;
pub mod store;
pub mod time;

pub use output::{Actuators, DigitDisplay, Font, Glyph, Rgb};
pub use store::{SettingText, SettingsStore};
pub use time::{NetworkTime, Rtc, TimeSource};
