//! Platform abstraction layer.
//!
//! All interactions with the operating system (reading the monotonic clock, coarse sleeping and
//! busy-wait hints) go through the [`Platform`] trait so that timing logic can be tested against
//! a virtual clock instead of wall-clock time.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::*;
pub(crate) use facade::*;
#[cfg(test)]
pub(crate) use fake::*;
pub(crate) use real::*;
