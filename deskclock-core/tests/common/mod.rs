//! Simulation harness for integration tests
//!
//! Provides:
//! - A shared simulated millisecond clock, advanced by the loop and by every
//!   sleep the core takes, so retry delays and the alarm chirp cost time
//! - Button pins driven by press timelines
//! - An RTC that keeps counting from the last time it was set
//! - A network time source that fails a scripted number of times
//! - Display and actuator mocks that record every call

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use deskclock_core::button::{ButtonConfig, ButtonId};
use deskclock_core::traits::{Actuators, DigitDisplay, Font, Glyph, NetworkTime, Rgb, Rtc, TimeSource};
use deskclock_core::{
    Board, ClockCore, MemoryStore, NetworkError, ServiceReport, TickFlag, Timestamp, WallClock,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

/// Shared simulated time in milliseconds
#[derive(Clone, Default)]
pub struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    pub fn new(start_ms: u64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn now(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay { time: self.clone(), total_ms: Rc::new(Cell::new(0)) }
    }

    /// Pin held down during each `[start, end)` window
    pub fn pin(&self, presses: &[(u64, u64)]) -> ScriptedPin {
        ScriptedPin { time: self.clone(), presses: Rc::new(RefCell::new(presses.to_vec())) }
    }

    pub fn rtc(&self, initial: WallClock) -> SimRtc {
        SimRtc::new(self.clone(), initial)
    }

    pub fn network(&self, utc_at_start: i64, failures: usize) -> SimNetwork {
        SimNetwork { time: self.clone(), utc_at_start, failures, calls: 0 }
    }
}

impl TimeSource for SimTime {
    fn now(&self) -> Timestamp {
        self.0.get()
    }
}

/// Delay that advances simulated time instead of sleeping
pub struct SimDelay {
    time: SimTime,
    total_ms: Rc<Cell<u64>>,
}

impl SimDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ms.get()
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let ms = u64::from(ns).div_ceil(1_000_000);
        self.time.advance(ms);
        self.total_ms.set(self.total_ms.get() + ms);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.time.advance(u64::from(ms));
        self.total_ms.set(self.total_ms.get() + u64::from(ms));
    }
}

/// Active-high pin following a press timeline
#[derive(Clone)]
pub struct ScriptedPin {
    time: SimTime,
    presses: Rc<RefCell<Vec<(u64, u64)>>>,
}

impl ScriptedPin {
    /// Add a press lasting `duration` ms from `start`
    pub fn press(&self, start: u64, duration: u64) {
        self.presses.borrow_mut().push((start, start + duration));
    }

    fn held(&self) -> bool {
        let now = self.time.now();
        self.presses.borrow().iter().any(|&(start, end)| now >= start && now < end)
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.held())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.held())
    }
}

/// RTC counting whole seconds of simulated time since it was last set
pub struct SimRtc {
    time: SimTime,
    set_unix: i64,
    set_at_ms: u64,
    pub busy_reads: u32,
    pub broken: bool,
    pub writes: Vec<WallClock>,
    pub trim: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcFault;

impl SimRtc {
    fn new(time: SimTime, initial: WallClock) -> Self {
        let set_at_ms = time.now();
        Self {
            time,
            set_unix: initial.to_unix().expect("valid start time"),
            set_at_ms,
            busy_reads: 0,
            broken: false,
            writes: Vec::new(),
            trim: None,
        }
    }

    /// Current fields without going through the trait
    pub fn peek(&self) -> WallClock {
        let elapsed = (self.time.now() - self.set_at_ms) / 1000;
        WallClock::from_unix(self.set_unix + elapsed as i64).expect("representable")
    }
}

impl Rtc for SimRtc {
    type Error = RtcFault;

    fn read_time(&mut self) -> nb::Result<WallClock, RtcFault> {
        if self.broken {
            return Err(nb::Error::Other(RtcFault));
        }
        if self.busy_reads > 0 {
            self.busy_reads -= 1;
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.peek())
    }

    fn set_time(&mut self, time: &WallClock) -> Result<(), RtcFault> {
        if self.broken {
            return Err(RtcFault);
        }
        self.set_unix = time.to_unix().ok_or(RtcFault)?;
        self.set_at_ms = self.time.now();
        self.writes.push(*time);
        Ok(())
    }

    fn set_trim(&mut self, trim: u8) -> Result<(), RtcFault> {
        self.trim = Some(trim);
        Ok(())
    }
}

/// Network time that fails `failures` times, then tracks simulated time
pub struct SimNetwork {
    time: SimTime,
    utc_at_start: i64,
    pub failures: usize,
    pub calls: usize,
}

impl NetworkTime for SimNetwork {
    fn fetch_utc_timestamp(&mut self) -> Result<i64, NetworkError> {
        self.calls += 1;
        if self.failures > 0 {
            self.failures -= 1;
            return Err(NetworkError::Timeout);
        }
        Ok(self.utc_at_start + (self.time.now() / 1000) as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Digit(usize, Glyph),
    Text(usize, String),
    Separator(bool),
    Clear,
    Brightness(u8),
    Font(Font, Rgb),
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub ops: Vec<DisplayOp>,
}

impl RecordingDisplay {
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Text(_, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_brightness(&self) -> Option<u8> {
        self.ops.iter().rev().find_map(|op| match op {
            DisplayOp::Brightness(level) => Some(*level),
            _ => None,
        })
    }
}

impl DigitDisplay for RecordingDisplay {
    type Error = Infallible;

    fn write_digit(&mut self, slot: usize, glyph: Glyph) -> Result<(), Infallible> {
        self.ops.push(DisplayOp::Digit(slot, glyph));
        Ok(())
    }

    fn write_text(&mut self, slot: usize, text: &str) -> Result<(), Infallible> {
        self.ops.push(DisplayOp::Text(slot, text.to_string()));
        Ok(())
    }

    fn set_separator(&mut self, visible: bool) -> Result<(), Infallible> {
        self.ops.push(DisplayOp::Separator(visible));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.ops.push(DisplayOp::Clear);
        Ok(())
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), Infallible> {
        self.ops.push(DisplayOp::Brightness(percent));
        Ok(())
    }

    fn set_font(&mut self, font: Font, color: Rgb) -> Result<(), Infallible> {
        self.ops.push(DisplayOp::Font(font, color));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorOp {
    Color(Rgb),
    Pattern(u8),
    Tone(u32),
    Duty(u16),
}

#[derive(Default)]
pub struct RecordingActuators {
    pub ops: Vec<ActuatorOp>,
}

impl Actuators for RecordingActuators {
    fn set_led_color(&mut self, color: Rgb) {
        self.ops.push(ActuatorOp::Color(color));
    }

    fn set_led_pattern(&mut self, pattern: u8) {
        self.ops.push(ActuatorOp::Pattern(pattern));
    }

    fn set_buzzer_tone(&mut self, hz: u32) {
        self.ops.push(ActuatorOp::Tone(hz));
    }

    fn set_buzzer_duty(&mut self, duty: u16) {
        self.ops.push(ActuatorOp::Duty(duty));
    }
}

pub type SimBoard =
    Board<SimRtc, SimNetwork, MemoryStore, RecordingDisplay, RecordingActuators, SimDelay>;

pub type SimCore<'a> = ClockCore<'a, SimTime, ScriptedPin, 3>;

/// Pins for mode, left (increment) and right (decrement)
pub struct Pins {
    pub mode: ScriptedPin,
    pub left: ScriptedPin,
    pub right: ScriptedPin,
}

impl Pins {
    pub fn new(time: &SimTime) -> Self {
        Self { mode: time.pin(&[]), left: time.pin(&[]), right: time.pin(&[]) }
    }
}

pub fn board(time: &SimTime, rtc_start: WallClock, utc_at_start: i64, failures: usize, store: MemoryStore) -> SimBoard {
    Board::new(
        time.rtc(rtc_start),
        time.network(utc_at_start, failures),
        store,
        RecordingDisplay::default(),
        RecordingActuators::default(),
        time.delay(),
    )
}

pub fn core<'a>(time: &'a SimTime, tick: &'a TickFlag, pins: &Pins) -> SimCore<'a> {
    ClockCore::builder(time, tick)
        .button(ButtonId::Mode, pins.mode.clone(), ButtonConfig::default())
        .button(ButtonId::Increment, pins.left.clone(), ButtonConfig::default())
        .button(ButtonId::Decrement, pins.right.clone(), ButtonConfig::default())
        .build()
        .expect("three buttons fit")
}

/// A ticked service call and the RTC reading right after it
#[derive(Debug, Clone, Copy)]
pub struct TickRecord {
    pub at: WallClock,
    pub report: ServiceReport,
}

/// Drive the main loop until simulated time reaches `until_ms`
///
/// Signals the tick flag at every second boundary and steps 10 ms between
/// iterations. Returns the reports of calls that consumed a tick, plus any
/// call that handled a button event.
pub fn run_until(
    core: &mut SimCore<'_>,
    board: &mut SimBoard,
    time: &SimTime,
    tick: &TickFlag,
    until_ms: u64,
) -> Vec<TickRecord> {
    let mut records = Vec::new();
    // a resumed run does not repeat the tick of the second it resumes in
    let mut last_second = (time.now() % 1000 != 0).then(|| time.now() / 1000);
    while time.now() < until_ms {
        let second = time.now() / 1000;
        if last_second != Some(second) {
            tick.signal();
            last_second = Some(second);
        }
        let report = core.service(board);
        if report.ticked || report.events_handled > 0 {
            records.push(TickRecord { at: board.rtc.peek(), report });
        }
        time.advance(10);
    }
    records
}

/// 2024-01-15 at the given time of day; a Monday in standard time
pub fn january(hour: u8, minute: u8, second: u8) -> WallClock {
    WallClock::new(2024, 1, 15, hour, minute, second).expect("valid date")
}

/// Store with defaults and the given overrides
pub fn store_with(overrides: &[(&str, &str)]) -> MemoryStore {
    use deskclock_core::traits::SettingsStore;

    let mut store = MemoryStore::with_defaults();
    for (key, value) in overrides {
        store.set(key, value).expect("override fits");
    }
    store
}
