//! Simulated Desk Clock Example
//!
//! Runs the clock core against host-side stand-ins for every peripheral:
//! a console "display", an RTC that counts simulated seconds and a network
//! time source. The alarm is set one minute ahead so the ring and its
//! automatic expiry show up in the output.
//!
//! ## What You'll Learn
//!
//! - Wiring a [`Board`] out of trait implementations
//! - Driving [`ClockCore::service`] from a main loop and a tick flag
//! - Reading [`ServiceReport`]s to follow what the core did
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example simulated_clock
//! ```

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use deskclock_core::button::{ButtonConfig, ButtonId};
use deskclock_core::traits::{
    Actuators, DigitDisplay, Font, Glyph, NetworkTime, Rgb, Rtc, SettingsStore, TimeSource,
};
use deskclock_core::{
    AlarmStatus, Board, ClockCore, MemoryStore, NetworkError, TickFlag, Timestamp, WallClock,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

/// 2024-03-01 07:14:50 UTC
const START_UTC: i64 = 1_709_277_290;

static TICK: TickFlag = TickFlag::new();

/// Milliseconds since the simulation started
#[derive(Clone, Default)]
struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl TimeSource for SimClock {
    fn now(&self) -> Timestamp {
        self.0.get()
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns).div_ceil(1_000_000));
    }
}

/// Nobody presses anything in this demo
struct IdleButton;

impl ErrorType for IdleButton {
    type Error = Infallible;
}

impl InputPin for IdleButton {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(true)
    }
}

struct SimRtc {
    clock: SimClock,
    base: i64,
    set_at: u64,
}

impl Rtc for SimRtc {
    type Error = Infallible;

    fn read_time(&mut self) -> nb::Result<WallClock, Infallible> {
        let elapsed = ((self.clock.now() - self.set_at) / 1000) as i64;
        WallClock::from_unix(self.base + elapsed).ok_or(nb::Error::WouldBlock)
    }

    fn set_time(&mut self, time: &WallClock) -> Result<(), Infallible> {
        self.base = time.to_unix().unwrap_or(self.base);
        self.set_at = self.clock.now();
        Ok(())
    }

    fn set_trim(&mut self, _trim: u8) -> Result<(), Infallible> {
        Ok(())
    }
}

struct SimNtp {
    clock: SimClock,
}

impl NetworkTime for SimNtp {
    fn fetch_utc_timestamp(&mut self) -> Result<i64, NetworkError> {
        Ok(START_UTC + (self.clock.now() / 1000) as i64)
    }
}

/// Prints digit changes as they happen
#[derive(Default)]
struct ConsoleDisplay {
    digits: [char; 6],
}

impl DigitDisplay for ConsoleDisplay {
    type Error = Infallible;

    fn write_digit(&mut self, slot: usize, glyph: Glyph) -> Result<(), Infallible> {
        if let Some(cell) = self.digits.get_mut(slot) {
            *cell = match glyph {
                Glyph::Blank => ' ',
                Glyph::Digit(d) => char::from(b'0' + d),
            };
        }
        Ok(())
    }

    fn write_text(&mut self, _slot: usize, text: &str) -> Result<(), Infallible> {
        println!("  [text] {}", text);
        Ok(())
    }

    fn set_separator(&mut self, _visible: bool) -> Result<(), Infallible> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.digits = [' '; 6];
        Ok(())
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), Infallible> {
        println!("  [display] brightness {}%", percent);
        Ok(())
    }

    fn set_font(&mut self, font: Font, color: Rgb) -> Result<(), Infallible> {
        println!("  [display] font {} in {}", font.label(), color.to_hex());
        Ok(())
    }
}

struct ConsoleLeds;

impl Actuators for ConsoleLeds {
    fn set_led_color(&mut self, _color: Rgb) {}

    fn set_led_pattern(&mut self, pattern: u8) {
        println!("  [leds] pattern {}", pattern);
    }

    fn set_buzzer_tone(&mut self, _hz: u32) {}

    fn set_buzzer_duty(&mut self, _duty: u16) {}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Simulated Desk Clock ===\n");

    let clock = SimClock::default();

    let mut store = MemoryStore::with_defaults();
    store.set("alarm_on", "Yes")?;
    store.set("alarm_hour", "7")?;
    store.set("alarm_min", "15")?;
    store.set("show_secs", "Yes")?;

    let mut core = ClockCore::<_, _, 3>::builder(&clock, &TICK)
        .button(ButtonId::Mode, IdleButton, ButtonConfig::default())
        .button(ButtonId::Increment, IdleButton, ButtonConfig::default())
        .button(ButtonId::Decrement, IdleButton, ButtonConfig::default())
        .build()?;

    let rtc = SimRtc { clock: clock.clone(), base: 0, set_at: 0 };
    let ntp = SimNtp { clock: clock.clone() };
    let mut board =
        Board::new(rtc, ntp, store, ConsoleDisplay::default(), ConsoleLeds, clock.clone());

    println!("Starting:");
    core.start(&mut board);

    let mut last_second = None;
    while clock.now() < 80_000 {
        let second = clock.now() / 1000;
        if last_second != Some(second) {
            // stands in for the RTC's 1 Hz interrupt
            TICK.signal();
            last_second = Some(second);
        }

        let report = core.service(&mut board);
        if report.ticked {
            let face: String = board.display.digits.iter().collect();
            let note = match report.alarm {
                AlarmStatus::Triggered => " <- alarm!",
                AlarmStatus::Expired => " <- alarm expired",
                _ => "",
            };
            let synced = if report.synced { " (synced)" } else { "" };
            if report.display_writes > 0 && (second % 10 == 0 || !note.is_empty()) {
                println!("{}{}{}", face, synced, note);
            }
        }
        clock.advance(10);
    }

    println!("\nDone. Last sync at {:?} ms", core.sync().last_sync());
    Ok(())
}
