#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Normalizes the observable execution time of operations to a fixed target duration.
//!
//! An observer who can measure how long an operation takes may learn things about its internal
//! state: which code path executed, how much data was processed, whether a cached result was
//! used or whether the operation failed. This package closes that timing side channel by
//! measuring every invocation of a workload and padding it so that all invocations take the same
//! fixed, caller-chosen duration.
//!
//! The package consists of three parts:
//!
//! * [`Stopwatch`] measures elapsed time using the highest resolution monotonic clock.
//! * [`PrecisionWaiter`] blocks the calling thread with sub-millisecond accuracy by sleeping for
//!   the bulk of a wait and spinning through the final [spin margin][DEFAULT_SPIN_MARGIN].
//! * [`Normalizer`] brackets a workload, computes the [`Deficit`] against its target duration
//!   and waits for whatever is left.
//!
//! Padding can only add time. A workload that takes longer than the target is not slowed down
//! further, so its duration remains observable. Only wall-clock duration is normalized; memory
//! and cache effects of the workload are out of scope.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use fixed_time::Normalizer;
//!
//! // Every password check takes 25 ms, whether the password matched early, late or not at all.
//! let normalizer = Normalizer::from_millis(25);
//!
//! let check = |candidate: &str| candidate == "correct horse battery staple";
//!
//! let before = Instant::now();
//! let accepted = normalizer.run(|| check("hunter2"));
//!
//! assert!(!accepted);
//! assert!(before.elapsed() >= Duration::from_millis(25));
//! ```
//!
//! # Failures
//!
//! Failed invocations are padded exactly like successful ones, otherwise the failure itself
//! would be observable. [`Normalizer::run_fallible()`] logs the error, pads the invocation and
//! then returns the error unchanged. Panics are padded and then resumed.
//!
//! # Logging
//!
//! Failures, overruns and settlements are reported through the [`tracing`] facade. No subscriber
//! is installed by this package.
//!
//! # Blocking
//!
//! All waiting is synchronous. The thread that invoked the workload is blocked until the target
//! duration has passed; there is no asynchronous variant.

mod builder;
mod deficit;
mod error;
mod invocation;
mod normalized;
mod normalizer;
mod pal;
mod stopwatch;
mod waiter;

pub use builder::*;
pub use deficit::*;
pub use error::*;
pub use invocation::*;
pub use normalized::*;
pub use normalizer::*;
pub use stopwatch::*;
pub use waiter::*;
