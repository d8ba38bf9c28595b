//! Button Timing Constants
//!
//! Defaults for the debounce filter. Mechanical tact switches settle within
//! 5-20 ms; the window leaves margin for worn contacts.

use fugit::MillisDurationU32;

/// Minimum contiguous assertion before a press counts.
pub const DEFAULT_DEBOUNCE: MillisDurationU32 = MillisDurationU32::millis(50);

/// Assertion time after which a press is classified as long.
pub const DEFAULT_LONG_PRESS: MillisDurationU32 = MillisDurationU32::millis(2000);

/// Buttons the clock is wired with: mode, increment, decrement.
pub const MAX_BUTTONS: usize = 3;
