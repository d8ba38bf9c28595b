//! Button Debouncing and Press Classification
//!
//! Tact switches bounce for a few milliseconds on every edge, and the clock
//! distinguishes a tap from a deliberate hold. Each button gets a
//! [`ButtonChannel`] that turns raw pin levels sampled on every loop
//! iteration into at most one [`Press::Short`] and one [`Press::Long`] per
//! physical press.
//!
//! ## Algorithm
//!
//! Per channel, on each poll at time `now`:
//!
//! 1. `pressed = level == active polarity`
//! 2. Press begins (pressed, not yet debouncing): remember `now` as the
//!    press start. Without `prevent_multiple`, the fired flags are cleared
//!    here.
//! 3. Still pressed and held longer than the debounce window:
//!    - short not yet fired and held less than the long threshold: **short**
//!    - held longer than the long threshold and long not yet fired: **long**
//! 4. Released: stop debouncing. With `prevent_multiple`, the fired flags are
//!    cleared here.
//!
//! A press shorter than the debounce window never fires. A press held past
//! the long threshold fires short once, then long once.
//!
//! ## Example
//!
//! ```rust
//! use core::convert::Infallible;
//! use deskclock_core::button::{ButtonConfig, ButtonDebouncer, ButtonId, Press};
//! use embedded_hal::digital::{ErrorType, InputPin};
//!
//! struct Held;
//! impl ErrorType for Held {
//!     type Error = Infallible;
//! }
//! impl InputPin for Held {
//!     fn is_high(&mut self) -> Result<bool, Infallible> { Ok(true) }
//!     fn is_low(&mut self) -> Result<bool, Infallible> { Ok(false) }
//! }
//!
//! let mut buttons: ButtonDebouncer<Held, 3> = ButtonDebouncer::new();
//! buttons.register(ButtonId::Mode, Held, ButtonConfig::default()).ok();
//!
//! assert!(buttons.poll_all(0).is_empty());
//! let events = buttons.poll_all(60);
//! assert_eq!(events[0].press, Press::Short);
//! ```

use embedded_hal::digital::InputPin;
use fugit::MillisDurationU32;
use heapless::Vec;

use crate::constants::input::{DEFAULT_DEBOUNCE, DEFAULT_LONG_PRESS};
use crate::macros::clock_debug;
use crate::time::Timestamp;

/// Logical button identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    /// Cycles screens, confirms, stops the alarm
    Mode,
    /// "left": increases the value on edit screens
    Increment,
    /// "right": decreases the value on edit screens
    Decrement,
}

impl ButtonId {
    /// Name the button is known by on the wire and in logs
    pub const fn name(self) -> &'static str {
        match self {
            ButtonId::Mode => "mode",
            ButtonId::Increment => "left",
            ButtonId::Decrement => "right",
        }
    }

    /// Look up by name; `increment` and `decrement` are accepted as aliases
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mode" => Some(ButtonId::Mode),
            "left" | "increment" => Some(ButtonId::Increment),
            "right" | "decrement" => Some(ButtonId::Decrement),
            _ => None,
        }
    }
}

/// Electrical level that means "pressed"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Pin reads high while pressed (pull-down wiring)
    #[default]
    ActiveHigh,
    /// Pin reads low while pressed (pull-up wiring)
    ActiveLow,
}

/// Press classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    /// Held past the debounce window
    Short,
    /// Held past the long-press threshold
    Long,
}

/// A classified press of one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Which button
    pub button: ButtonId,
    /// Short or long
    pub press: Press,
}

impl ButtonEvent {
    /// Create an event
    pub const fn new(button: ButtonId, press: Press) -> Self {
        Self { button, press }
    }

    /// Long press of the mode button
    pub fn is_mode_long(&self) -> bool {
        self.button == ButtonId::Mode && self.press == Press::Long
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ButtonEvent {
    fn format(&self, fmt: defmt::Formatter) {
        let press = match self.press {
            Press::Short => "short",
            Press::Long => "long",
        };
        defmt::write!(fmt, "{}:{}", self.button.name(), press)
    }
}

/// Timing and wiring of one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonConfig {
    /// Level that means pressed
    pub polarity: Polarity,
    /// Minimum hold before anything fires
    pub debounce: MillisDurationU32,
    /// Hold after which a press is long
    pub long_press: MillisDurationU32,
    /// Clear fired flags on release instead of on the next press start
    pub prevent_multiple: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            polarity: Polarity::ActiveHigh,
            debounce: DEFAULT_DEBOUNCE,
            long_press: DEFAULT_LONG_PRESS,
            prevent_multiple: true,
        }
    }
}

impl ButtonConfig {
    /// Set the pressed level
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Set the debounce window
    pub fn with_debounce(mut self, debounce: MillisDurationU32) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the long-press threshold
    pub fn with_long_press(mut self, long_press: MillisDurationU32) -> Self {
        self.long_press = long_press;
        self
    }

    /// Choose when fired flags reset
    pub fn with_prevent_multiple(mut self, prevent_multiple: bool) -> Self {
        self.prevent_multiple = prevent_multiple;
        self
    }
}

/// One debounced input
#[derive(Debug)]
pub struct ButtonChannel<P> {
    id: ButtonId,
    pin: P,
    config: ButtonConfig,
    is_debouncing: bool,
    press_start: Timestamp,
    short_fired: bool,
    long_fired: bool,
}

impl<P: InputPin> ButtonChannel<P> {
    /// Wrap `pin`
    pub fn new(id: ButtonId, pin: P, config: ButtonConfig) -> Self {
        Self {
            id,
            pin,
            config,
            is_debouncing: false,
            press_start: 0,
            short_fired: false,
            long_fired: false,
        }
    }

    /// Logical identity
    pub fn id(&self) -> ButtonId {
        self.id
    }

    /// Timing and wiring
    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Whether a press is in progress
    pub fn is_debouncing(&self) -> bool {
        self.is_debouncing
    }

    /// Sample the pin once and advance the state machine
    ///
    /// A pin read error counts as "not pressed".
    pub fn poll(&mut self, now: Timestamp) -> Option<Press> {
        let pressed = match self.pin.is_high() {
            Ok(high) => high == (self.config.polarity == Polarity::ActiveHigh),
            Err(_) => {
                clock_debug!("button {} read failed", self.id.name());
                false
            }
        };

        if !pressed {
            self.is_debouncing = false;
            if self.config.prevent_multiple {
                self.short_fired = false;
                self.long_fired = false;
            }
            return None;
        }

        if !self.is_debouncing {
            self.press_start = now;
            self.is_debouncing = true;
            if !self.config.prevent_multiple {
                self.short_fired = false;
                self.long_fired = false;
            }
        }

        let held = now.saturating_sub(self.press_start);
        let debounce = u64::from(self.config.debounce.to_millis());
        let long_press = u64::from(self.config.long_press.to_millis());
        if held <= debounce {
            return None;
        }

        if !self.short_fired && held < long_press {
            self.short_fired = true;
            Some(Press::Short)
        } else if held > long_press && !self.long_fired {
            self.long_fired = true;
            Some(Press::Long)
        } else {
            None
        }
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

/// Debounces up to `N` buttons
#[derive(Debug)]
pub struct ButtonDebouncer<P, const N: usize> {
    channels: Vec<ButtonChannel<P>, N>,
}

impl<P: InputPin, const N: usize> Default for ButtonDebouncer<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: InputPin, const N: usize> ButtonDebouncer<P, N> {
    /// Empty debouncer
    pub const fn new() -> Self {
        Self { channels: Vec::new() }
    }

    /// Add a channel
    ///
    /// Hands the pin back if all `N` slots are taken or `id` is already
    /// registered.
    pub fn register(&mut self, id: ButtonId, pin: P, config: ButtonConfig) -> Result<(), P> {
        if self.channels.iter().any(|c| c.id == id) {
            return Err(pin);
        }
        self.channels
            .push(ButtonChannel::new(id, pin, config))
            .map_err(ButtonChannel::release)
    }

    /// Registered channel count
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// No channels registered
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channel for `id`
    pub fn channel(&self, id: ButtonId) -> Option<&ButtonChannel<P>> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Evaluate every channel exactly once, in registration order
    pub fn poll_all(&mut self, now: Timestamp) -> Vec<ButtonEvent, N> {
        let mut events = Vec::new();
        for channel in self.channels.iter_mut() {
            if let Some(press) = channel.poll(now) {
                // one event per channel per poll, N channels
                let _ = events.push(ButtonEvent::new(channel.id, press));
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use proptest::prelude::*;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedPin(Rc<Cell<bool>>);

    impl SharedPin {
        fn set(&self, high: bool) {
            self.0.set(high);
        }
    }

    impl ErrorType for SharedPin {
        type Error = Infallible;
    }

    impl InputPin for SharedPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    /// Hold the button for `duration` ms with 1 ms polling, then release.
    fn press_for(duration: u64) -> std::vec::Vec<Press> {
        let pin = SharedPin::default();
        let mut buttons: ButtonDebouncer<SharedPin, 3> = ButtonDebouncer::new();
        buttons
            .register(ButtonId::Mode, pin.clone(), ButtonConfig::default())
            .ok()
            .unwrap();

        let mut presses = std::vec::Vec::new();
        pin.set(true);
        for t in 0..duration {
            presses.extend(buttons.poll_all(t).iter().map(|e| e.press));
        }
        pin.set(false);
        for t in duration..duration + 100 {
            presses.extend(buttons.poll_all(t).iter().map(|e| e.press));
        }
        presses
    }

    #[test]
    fn bounce_never_fires() {
        assert!(press_for(10).is_empty());
        assert!(press_for(50).is_empty());
    }

    #[test]
    fn thresholds_are_strict() {
        let pin = SharedPin::default();
        let mut buttons: ButtonDebouncer<SharedPin, 1> = ButtonDebouncer::new();
        buttons.register(ButtonId::Mode, pin.clone(), ButtonConfig::default()).ok().unwrap();

        pin.set(true);
        assert!(buttons.poll_all(0).is_empty());
        // held exactly the debounce window
        assert!(buttons.poll_all(50).is_empty());
        assert_eq!(buttons.poll_all(51)[0].press, Press::Short);
        // held exactly the long-press threshold
        assert!(buttons.poll_all(2_000).is_empty());
        assert_eq!(buttons.poll_all(2_001)[0].press, Press::Long);
    }

    #[test]
    fn press_lengths_at_the_thresholds() {
        assert!(press_for(51).is_empty());
        assert_eq!(press_for(52), [Press::Short]);
        assert_eq!(press_for(2_001), [Press::Short]);
        assert_eq!(press_for(2_002), [Press::Short, Press::Long]);
    }

    #[test]
    fn tap_fires_one_short() {
        assert_eq!(press_for(200), [Press::Short]);
    }

    #[test]
    fn hold_fires_short_then_long() {
        assert_eq!(press_for(3000), [Press::Short, Press::Long]);
    }

    #[test]
    fn active_low_inverts_level() {
        let pin = SharedPin::default();
        let mut buttons: ButtonDebouncer<SharedPin, 1> = ButtonDebouncer::new();
        let config = ButtonConfig::default().with_polarity(Polarity::ActiveLow);
        buttons.register(ButtonId::Increment, pin.clone(), config).ok().unwrap();

        pin.set(true);
        assert!(buttons.poll_all(0).is_empty());
        assert!(buttons.poll_all(100).is_empty());

        pin.set(false);
        assert!(buttons.poll_all(200).is_empty());
        let events = buttons.poll_all(300);
        assert_eq!(events.as_slice(), [ButtonEvent::new(ButtonId::Increment, Press::Short)]);
    }

    #[test]
    fn second_tap_fires_again() {
        let pin = SharedPin::default();
        let mut buttons: ButtonDebouncer<SharedPin, 1> = ButtonDebouncer::new();
        buttons.register(ButtonId::Mode, pin.clone(), ButtonConfig::default()).ok().unwrap();

        for start in [0u64, 1000] {
            pin.set(true);
            assert!(buttons.poll_all(start).is_empty());
            assert_eq!(buttons.poll_all(start + 100).len(), 1);
            assert!(buttons.poll_all(start + 200).is_empty());
            pin.set(false);
            assert!(buttons.poll_all(start + 300).is_empty());
        }
    }

    #[test]
    fn prevent_multiple_off_resets_on_press() {
        let pin = SharedPin::default();
        let mut buttons: ButtonDebouncer<SharedPin, 1> = ButtonDebouncer::new();
        let config = ButtonConfig::default().with_prevent_multiple(false);
        buttons.register(ButtonId::Mode, pin.clone(), config).ok().unwrap();

        pin.set(true);
        buttons.poll_all(0);
        assert_eq!(buttons.poll_all(100).len(), 1);
        pin.set(false);
        buttons.poll_all(150);
        pin.set(true);
        buttons.poll_all(200);
        assert_eq!(buttons.poll_all(300).len(), 1);
    }

    #[test]
    fn register_rejects_duplicates_and_overflow() {
        let mut buttons: ButtonDebouncer<SharedPin, 2> = ButtonDebouncer::new();
        assert!(buttons.register(ButtonId::Mode, SharedPin::default(), ButtonConfig::default()).is_ok());
        assert!(buttons.register(ButtonId::Mode, SharedPin::default(), ButtonConfig::default()).is_err());
        assert!(buttons.register(ButtonId::Increment, SharedPin::default(), ButtonConfig::default()).is_ok());
        assert!(buttons.register(ButtonId::Decrement, SharedPin::default(), ButtonConfig::default()).is_err());
        assert_eq!(buttons.len(), 2);
    }

    #[test]
    fn names_round_trip_with_aliases() {
        for id in [ButtonId::Mode, ButtonId::Increment, ButtonId::Decrement] {
            assert_eq!(ButtonId::from_name(id.name()), Some(id));
        }
        assert_eq!(ButtonId::from_name("increment"), Some(ButtonId::Increment));
        assert_eq!(ButtonId::from_name("decrement"), Some(ButtonId::Decrement));
        assert_eq!(ButtonId::from_name("snooze"), None);
    }

    proptest! {
        #[test]
        fn sub_debounce_presses_are_silent(duration in 0u64..=50) {
            prop_assert!(press_for(duration).is_empty());
        }

        #[test]
        fn taps_fire_exactly_one_short(duration in 52u64..=2001) {
            prop_assert_eq!(press_for(duration), std::vec![Press::Short]);
        }

        #[test]
        fn holds_fire_short_then_long(duration in 2002u64..6000) {
            prop_assert_eq!(press_for(duration), std::vec![Press::Short, Press::Long]);
        }
    }
}
