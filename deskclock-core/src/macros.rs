//! Optional logging
//!
//! The core logs through the `log` facade when the `std` feature is on and
//! compiles the calls away otherwise, so bare-metal builds carry no logger.

#[cfg(feature = "log")]
macro_rules! clock_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! clock_info {
    ($($arg:tt)*) => { () };
}

#[cfg(feature = "log")]
macro_rules! clock_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! clock_warn {
    ($($arg:tt)*) => { () };
}

#[cfg(feature = "log")]
macro_rules! clock_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! clock_debug {
    ($($arg:tt)*) => { () };
}

pub(crate) use clock_debug;
pub(crate) use clock_info;
pub(crate) use clock_warn;
