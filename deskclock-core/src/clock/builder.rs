//! Clock core builder

use embedded_hal::digital::InputPin;
use fugit::{MillisDurationU32, SecsDurationU32};

use crate::alarm::AlarmEngine;
use crate::button::{ButtonConfig, ButtonDebouncer, ButtonId};
use crate::config::ClockConfig;
use crate::constants::time::{ADJUST_POLL_INTERVAL, ADJUST_TIMEOUT};
use crate::display::DisplayReconciler;
use crate::errors::ClockError;
use crate::mode::ModeStateMachine;
use crate::sync::{DstMode, TimeSyncManager};
use crate::tick::TickFlag;
use crate::traits::TimeSource;

use super::ClockCore;

/// Builder for [`ClockCore`]
///
/// ```rust
/// # use core::convert::Infallible;
/// # use embedded_hal::digital::{ErrorType, InputPin};
/// # struct Pin;
/// # impl ErrorType for Pin { type Error = Infallible; }
/// # impl InputPin for Pin {
/// #     fn is_high(&mut self) -> Result<bool, Infallible> { Ok(false) }
/// #     fn is_low(&mut self) -> Result<bool, Infallible> { Ok(true) }
/// # }
/// use deskclock_core::button::{ButtonConfig, ButtonId};
/// use deskclock_core::time::FixedTime;
/// use deskclock_core::{ClockCore, DstMode, TickFlag};
/// use fugit::SecsDurationU32;
///
/// static TICK: TickFlag = TickFlag::new();
/// let time = FixedTime::new(0);
///
/// let _core = ClockCore::<_, _, 3>::builder(&time, &TICK)
///     .button(ButtonId::Mode, Pin, ButtonConfig::default())
///     .button(ButtonId::Increment, Pin, ButtonConfig::default())
///     .button(ButtonId::Decrement, Pin, ButtonConfig::default())
///     .sync_interval(SecsDurationU32::secs(1800))
///     .dst_mode(DstMode::AutoNa)
///     .build()
///     .unwrap();
/// ```
pub struct ClockCoreBuilder<'t, T, P, const B: usize> {
    time: &'t T,
    tick: &'t TickFlag,
    buttons: ButtonDebouncer<P, B>,
    registration_failed: bool,
    sync: TimeSyncManager,
    adjust_timeout: MillisDurationU32,
    poll_interval: MillisDurationU32,
}

impl<'t, T: TimeSource, P: InputPin, const B: usize> ClockCoreBuilder<'t, T, P, B> {
    /// Start from defaults
    pub fn new(time: &'t T, tick: &'t TickFlag) -> Self {
        Self {
            time,
            tick,
            buttons: ButtonDebouncer::new(),
            registration_failed: false,
            sync: TimeSyncManager::new(),
            adjust_timeout: ADJUST_TIMEOUT,
            poll_interval: ADJUST_POLL_INTERVAL,
        }
    }

    /// Register a button
    pub fn button(mut self, id: ButtonId, pin: P, config: ButtonConfig) -> Self {
        if self.buttons.register(id, pin, config).is_err() {
            self.registration_failed = true;
        }
        self
    }

    /// Time between network syncs
    pub fn sync_interval(mut self, interval: SecsDurationU32) -> Self {
        self.sync = self.sync.with_interval(interval);
        self
    }

    /// Sleep between failed time requests
    pub fn retry_delay(mut self, delay: MillisDurationU32) -> Self {
        self.sync = self.sync.with_retry_delay(delay);
        self
    }

    /// Retries after the first failed time request
    pub fn sync_retries(mut self, retries: u8) -> Self {
        self.sync = self.sync.with_max_retries(retries);
        self
    }

    /// DST rule used until [`ClockCore::start`] loads the stored one
    pub fn dst_mode(mut self, mode: DstMode) -> Self {
        self.sync.set_dst_mode(mode);
        self
    }

    /// Idle time before an edit screen gives up
    pub fn adjust_timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.adjust_timeout = timeout;
        self
    }

    /// Sleep between button polls on edit screens
    pub fn poll_interval(mut self, interval: MillisDurationU32) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Finish; fails if a button could not be registered
    pub fn build(self) -> Result<ClockCore<'t, T, P, B>, ClockError> {
        if self.registration_failed {
            return Err(ClockError::ButtonRegistration);
        }
        Ok(ClockCore {
            time: self.time,
            tick: self.tick,
            buttons: self.buttons,
            sync: self.sync,
            alarm: AlarmEngine::default(),
            reconciler: DisplayReconciler::new(),
            modes: ModeStateMachine::new(),
            config: ClockConfig::default(),
            adjust_timeout: self.adjust_timeout,
            poll_interval: self.poll_interval,
        })
    }
}
