//! Collaborator bundle
//!
//! A [`Board`] owns one instance of every peripheral the core talks to and
//! is lent to [`ClockCore`](super::ClockCore) for the duration of each call.
//! Fields are public so firmware can reach a peripheral between calls, e.g.
//! the settings store after a settings-page submission.

/// Peripherals of one clock
#[derive(Debug)]
pub struct Board<R, N, S, D, A, Y> {
    /// Real-time clock chip
    pub rtc: R,
    /// Network time transport
    pub network: N,
    /// Settings store
    pub store: S,
    /// Digit display
    pub display: D,
    /// LED strip and buzzer
    pub actuators: A,
    /// Blocking delay provider
    pub delay: Y,
}

impl<R, N, S, D, A, Y> Board<R, N, S, D, A, Y> {
    /// Bundle the peripherals
    pub fn new(rtc: R, network: N, store: S, display: D, actuators: A, delay: Y) -> Self {
        Self { rtc, network, store, display, actuators, delay }
    }
}
