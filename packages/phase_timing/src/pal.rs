//! Platform abstraction layer for the monotonic clock.
//!
//! Stopwatches read time through this layer so tests can drive the clock by hand
//! instead of sleeping.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
