//! Output Devices
//!
//! The clock face is a row of small screens, one per digit slot, and the
//! case carries an LED strip and a piezo buzzer. Glyph rendering and font
//! bitmaps live in the display driver; the core only says *what* goes in
//! which slot.

use core::fmt::{self, Debug, Write};
use core::str::FromStr;

use heapless::String;

/// Content of one digit slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Slot dark
    Blank,
    /// A decimal digit, 0-9
    Digit(u8),
}

impl Glyph {
    /// Units digit of `value`
    pub const fn units(value: u32) -> Self {
        Glyph::Digit((value % 10) as u8)
    }
}

/// Digit style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    /// Glowing nixie tube digits
    #[default]
    Nixie,
    /// Dot matrix
    DotMatrix,
    /// Seven-segment
    SevenSegment,
}

impl Font {
    /// All fonts in settings-page order
    pub const ALL: [Font; 3] = [Font::Nixie, Font::DotMatrix, Font::SevenSegment];

    /// Identifier stored in the settings
    pub const fn name(self) -> &'static str {
        match self {
            Font::Nixie => "nixie",
            Font::DotMatrix => "dot",
            Font::SevenSegment => "7seg",
        }
    }

    /// Human-readable name
    pub const fn label(self) -> &'static str {
        match self {
            Font::Nixie => "Nixie",
            Font::DotMatrix => "Dot Matrix",
            Font::SevenSegment => "7 Segment",
        }
    }

    /// Parse a stored identifier
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|font| font.name() == name)
    }
}

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

/// Error parsing an `#rrggbb` color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidColor;

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected #rrggbb")
    }
}

impl Rgb {
    /// LEDs off
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Create from components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as `#rrggbb`
    pub fn to_hex(&self) -> String<7> {
        let mut out = String::new();
        // 7 bytes always fit
        let _ = write!(out, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
        out
    }
}

impl FromStr for Rgb {
    type Err = InvalidColor;

    /// Accepts `#rrggbb`, case-insensitive. The settings page submits the
    /// `#` URL-encoded, so `%23rrggbb` is accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("%23"))
            .ok_or(InvalidColor)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidColor);
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| InvalidColor);
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Multi-slot digit display
///
/// Slots are numbered left to right from 0. Every write goes over a slow
/// bus, which is why the core diffs against a cache before calling in.
pub trait DigitDisplay {
    /// Bus or driver error
    type Error: Debug;

    /// Draw one digit (or blank) in `slot`
    fn write_digit(&mut self, slot: usize, glyph: Glyph) -> Result<(), Self::Error>;

    /// Draw a line of text starting at `slot`
    fn write_text(&mut self, slot: usize, text: &str) -> Result<(), Self::Error>;

    /// Show or hide the hour/minute separator
    fn set_separator(&mut self, visible: bool) -> Result<(), Self::Error>;

    /// Blank every slot
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Backlight level in percent
    fn set_brightness(&mut self, percent: u8) -> Result<(), Self::Error>;

    /// Digit style and color
    fn set_font(&mut self, font: Font, color: Rgb) -> Result<(), Self::Error>;
}

/// LED strip and buzzer
///
/// Both are write-only peripherals with nothing to report back.
pub trait Actuators {
    /// Fill the whole strip with one color
    fn set_led_color(&mut self, color: Rgb);

    /// Select one of the strip's animation patterns
    fn set_led_pattern(&mut self, pattern: u8);

    /// Buzzer frequency in Hz
    fn set_buzzer_tone(&mut self, hz: u32);

    /// Buzzer PWM duty, 0 silences it
    fn set_buzzer_duty(&mut self, duty: u16);
}
