//! One-second tick flag
//!
//! The RTC's 1 Hz output raises an interrupt whose only job is to set this
//! flag. The main loop takes it once per iteration. There is exactly one
//! writer (the ISR) and one reader (the loop), so a single atomic boolean is
//! enough; a tick that arrives while the previous one is still pending is
//! merged into it.
//!
//! ```rust
//! use deskclock_core::TickFlag;
//!
//! static TICK: TickFlag = TickFlag::new();
//!
//! // In the 1 Hz interrupt handler
//! TICK.signal();
//!
//! // In the main loop
//! assert!(TICK.take());
//! assert!(!TICK.take());
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-writer, single-reader tick flag
#[derive(Debug, Default)]
pub struct TickFlag(AtomicBool);

impl TickFlag {
    /// Create a cleared flag, usable in a `static`
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Set the flag. Interrupt safe: no I/O, no blocking.
    pub fn signal(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Read and clear the flag in one step
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Read without clearing
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
