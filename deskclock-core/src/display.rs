//! Minimal-Diff Display Updates
//!
//! Each digit slot is a separate screen behind a slow bus, so repainting the
//! whole face every second would be visible and wasteful. The
//! [`DisplayReconciler`] remembers what every slot last showed and only
//! writes the slots whose content changes.
//!
//! ## Layouts
//!
//! - **6 digits** (seconds shown): `[h10, h1, m10, m1, s10, s1]`
//! - **4 digits**: `[h10, h1, m10, m1]`, a separator that is lit on odd
//!   seconds, and an auxiliary text line in slot 4 (alarm status or date)
//!   rewritten only when the minute changes
//!
//! In 12-hour mode the hour runs 1-12, and the 4-digit layout blanks the
//! leading hour digit below 10.
//!
//! ## Cache Invalidation
//!
//! Any change of a global attribute (layout, 12/24 hours, brightness, font)
//! must be followed by [`DisplayReconciler::invalidate`], which forces one
//! full repaint. A failed write leaves its slot unknown so it is retried on
//! the next render.

use core::fmt::Write;

use heapless::String;

use crate::constants::display::{AUX_TEXT_SLOT, DIGIT_SLOTS, MAX_TEXT_LEN};
use crate::macros::clock_debug;
use crate::time::{TimeOfDay, WallClock, MONTH_NAMES, WEEKDAY_NAMES};
use crate::traits::{DigitDisplay, Glyph};

/// Auxiliary text line
pub type AuxText = String<MAX_TEXT_LEN>;

/// What the cache knows about one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Unknown,
    Shown(Glyph),
}

/// Per-render layout choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayFormat {
    /// 6-digit layout with seconds
    pub show_seconds: bool,
    /// Hours 1-12 instead of 0-23
    pub twelve_hour: bool,
}

/// Slot cache and diffing renderer
#[derive(Debug, Clone)]
pub struct DisplayReconciler {
    slots: [SlotState; DIGIT_SLOTS],
    separator: Option<bool>,
    aux_minute: Option<u8>,
    format: Option<DisplayFormat>,
}

impl Default for DisplayReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayReconciler {
    /// Everything unknown
    pub const fn new() -> Self {
        Self {
            slots: [SlotState::Unknown; DIGIT_SLOTS],
            separator: None,
            aux_minute: None,
            format: None,
        }
    }

    /// Forget the cache so the next render repaints every slot
    pub fn invalidate(&mut self) {
        self.slots = [SlotState::Unknown; DIGIT_SLOTS];
        self.separator = None;
        self.aux_minute = None;
    }

    /// Glyph the cache believes `slot` shows
    pub fn cached(&self, slot: usize) -> Option<Glyph> {
        match self.slots.get(slot) {
            Some(SlotState::Shown(glyph)) => Some(*glyph),
            _ => None,
        }
    }

    /// Update the face for `time`; returns the number of hardware writes
    ///
    /// `aux` is only evaluated when the auxiliary line needs rewriting.
    pub fn render<D, F>(
        &mut self,
        display: &mut D,
        time: TimeOfDay,
        format: DisplayFormat,
        aux: F,
    ) -> usize
    where
        D: DigitDisplay,
        F: FnOnce() -> AuxText,
    {
        if self.format != Some(format) {
            self.invalidate();
            self.format = Some(format);
        }

        let hour = display_hour(time.hour, format.twelve_hour);
        let mut writes = 0;

        if format.show_seconds {
            let digits = [
                tens(hour),
                units(hour),
                tens(time.minute),
                units(time.minute),
                tens(time.second),
                units(time.second),
            ];
            for (slot, glyph) in digits.into_iter().enumerate() {
                writes += self.write_slot(display, slot, glyph);
            }
            return writes;
        }

        let leading = if format.twelve_hour && hour < 10 { Glyph::Blank } else { tens(hour) };
        let digits = [leading, units(hour), tens(time.minute), units(time.minute)];
        for (slot, glyph) in digits.into_iter().enumerate() {
            writes += self.write_slot(display, slot, glyph);
        }

        let lit = time.second % 2 == 1;
        if self.separator != Some(lit) {
            match display.set_separator(lit) {
                Ok(()) => {
                    self.separator = Some(lit);
                    writes += 1;
                }
                Err(_e) => {
                    clock_debug!("separator write failed: {:?}", _e);
                    self.separator = None;
                }
            }
        }

        if self.aux_minute != Some(time.minute) {
            let text = aux();
            match display.write_text(AUX_TEXT_SLOT, &text) {
                Ok(()) => {
                    self.aux_minute = Some(time.minute);
                    writes += 1;
                }
                Err(_e) => {
                    clock_debug!("aux text write failed: {:?}", _e);
                    self.aux_minute = None;
                }
            }
        }

        writes
    }

    /// Show `value` right-aligned in `digits` slots starting at `position`
    ///
    /// Used by the edit screens. Only changed digits are written.
    pub fn show_number<D: DigitDisplay>(
        &mut self,
        display: &mut D,
        value: u32,
        position: usize,
        digits: usize,
    ) -> usize {
        let mut rest = value;
        let mut writes = 0;
        for slot in (position..position + digits).rev() {
            writes += self.write_slot(display, slot, Glyph::units(rest));
            rest /= 10;
        }
        writes
    }

    fn write_slot<D: DigitDisplay>(&mut self, display: &mut D, slot: usize, glyph: Glyph) -> usize {
        let Some(state) = self.slots.get_mut(slot) else {
            return 0;
        };
        if *state == SlotState::Shown(glyph) {
            return 0;
        }
        match display.write_digit(slot, glyph) {
            Ok(()) => {
                *state = SlotState::Shown(glyph);
                1
            }
            Err(_e) => {
                clock_debug!("digit {} write failed: {:?}", slot, _e);
                *state = SlotState::Unknown;
                0
            }
        }
    }
}

/// Hour as shown: 0-23, or 1-12 in 12-hour mode
pub fn display_hour(hour24: u8, twelve_hour: bool) -> u8 {
    if !twelve_hour {
        return hour24;
    }
    match hour24 % 12 {
        0 => 12,
        h => h,
    }
}

/// `"Alarm ON  6:30"` or `"Alarm OFF"`
pub fn alarm_text(enabled: bool, hour: u8, minute: u8) -> AuxText {
    let mut text = AuxText::new();
    // longest form is 14 characters
    let _ = if enabled {
        write!(text, "Alarm ON  {}:{:02}", hour, minute)
    } else {
        text.write_str("Alarm OFF")
    };
    text
}

/// `"Sat 15 Jun"`
pub fn date_text(date: &WallClock) -> AuxText {
    let mut text = AuxText::new();
    let weekday = date.weekday().and_then(|d| WEEKDAY_NAMES.get(usize::from(d)));
    let month = MONTH_NAMES.get(usize::from(date.month.saturating_sub(1)));
    if let (Some(weekday), Some(month)) = (weekday, month) {
        let _ = write!(text, "{} {:02} {}", weekday, date.day, month);
    }
    text
}

fn tens(value: u8) -> Glyph {
    Glyph::Digit(value / 10 % 10)
}

fn units(value: u8) -> Glyph {
    Glyph::Digit(value % 10)
}
