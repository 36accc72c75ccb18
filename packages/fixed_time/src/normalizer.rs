use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::pal::PlatformFacade;
use crate::{Invocation, Normalized, NormalizerBuilder, PrecisionWaiter};

const STARTED_ON_ENTRY: &str = "the invocation stopwatch is always started on entry";

/// Makes every invocation of a workload take the same fixed amount of time.
///
/// The normalizer measures how long a workload took and then blocks the caller for the
/// remainder of the target duration, so that an observer timing the call learns nothing about
/// the code path taken, the amount of data processed or whether the workload failed.
///
/// The only thing that cannot be hidden is a workload that takes longer than the target: time
/// spent cannot be taken back, so such an invocation returns as soon as the workload does. Choose
/// a target above the slowest expected workload.
///
/// A normalizer is immutable configuration. Create one per kind of operation and share it
/// freely, including between threads. Each invocation keeps its own measurement state.
///
/// # Examples
///
/// Wrapping a closure:
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use fixed_time::Normalizer;
///
/// let normalizer = Normalizer::from_millis(20);
///
/// let before = Instant::now();
/// let answer = normalizer.run(|| 6 * 7);
///
/// assert_eq!(answer, 42);
/// assert!(before.elapsed() >= Duration::from_millis(20));
/// ```
///
/// Bracketing a workload by hand, for hosts that expose separate entry and exit hooks:
///
/// ```
/// use fixed_time::{Normalizer, Outcome};
///
/// let normalizer = Normalizer::from_millis(5);
///
/// let invocation = normalizer.on_entry();
/// let result: Result<u32, String> = Err("no such image".to_string());
///
/// let settlement = match &result {
///     Ok(_) => invocation.on_exit().unwrap(),
///     Err(e) => invocation.on_failure(e).unwrap(),
/// };
///
/// assert_eq!(settlement.outcome(), Outcome::Failed);
/// ```
#[derive(Clone, Debug)]
pub struct Normalizer {
    target: Duration,
    waiter: PrecisionWaiter,
    platform: PlatformFacade,
}

impl Normalizer {
    /// Creates a normalizer that pads every invocation to `target`, using the default
    /// spin margin.
    #[must_use]
    pub fn new(target: Duration) -> Self {
        Self::builder(target).build()
    }

    /// Creates a normalizer that pads every invocation to `millis` milliseconds.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Starts building a normalizer with non-default settings.
    pub fn builder(target: Duration) -> NormalizerBuilder {
        NormalizerBuilder::new(target)
    }

    pub(crate) fn from_parts(
        target: Duration,
        waiter: PrecisionWaiter,
        platform: PlatformFacade,
    ) -> Self {
        Self {
            target,
            waiter,
            platform,
        }
    }

    /// The duration every invocation is padded to.
    #[must_use]
    pub fn target(&self) -> Duration {
        self.target
    }

    /// The tail of each padding wait that is spent spinning instead of sleeping.
    #[must_use]
    pub fn spin_margin(&self) -> Duration {
        self.waiter.spin_margin()
    }

    /// Marks the start of a workload.
    ///
    /// Call this immediately before the workload begins and settle the returned invocation
    /// immediately after it ends. Prefer [`run()`][Self::run] or
    /// [`run_fallible()`][Self::run_fallible], which cannot be used out of order.
    pub fn on_entry(&self) -> Invocation<'_> {
        Invocation::begin(self)
    }

    /// Runs `workload` and returns its result no sooner than the target duration after the
    /// call started.
    ///
    /// If the workload panics, the panic is logged, the invocation is padded like any other
    /// and the panic then continues to unwind into the caller.
    pub fn run<R>(&self, workload: impl FnOnce() -> R) -> R {
        let invocation = self.on_entry();

        // The unwind is resumed after settling, so nothing observes state left by the panic.
        match panic::catch_unwind(AssertUnwindSafe(workload)) {
            Ok(value) => {
                invocation.on_exit().expect(STARTED_ON_ENTRY);
                value
            }
            Err(payload) => settle_unwind(invocation, payload),
        }
    }

    /// Runs a fallible `workload`, padding successful and failed invocations alike.
    ///
    /// An error returned by the workload is logged and then returned to the caller unchanged,
    /// after the padding has been applied. Panics are handled as in [`run()`][Self::run].
    ///
    /// # Errors
    ///
    /// Returns the error returned by `workload`, if any.
    pub fn run_fallible<T, E>(&self, workload: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: Display,
    {
        let invocation = self.on_entry();

        match panic::catch_unwind(AssertUnwindSafe(workload)) {
            Ok(Ok(value)) => {
                invocation.on_exit().expect(STARTED_ON_ENTRY);
                Ok(value)
            }
            Ok(Err(error)) => {
                invocation.on_failure(&error).expect(STARTED_ON_ENTRY);
                Err(error)
            }
            Err(payload) => settle_unwind(invocation, payload),
        }
    }

    /// Decorates `workload` so that every call to it is normalized by this normalizer.
    #[must_use]
    pub fn wrap<F>(self, workload: F) -> Normalized<F> {
        Normalized::new(self, workload)
    }

    pub(crate) fn waiter(&self) -> &PrecisionWaiter {
        &self.waiter
    }

    pub(crate) fn platform(&self) -> &PlatformFacade {
        &self.platform
    }
}

fn settle_unwind(invocation: Invocation<'_>, payload: Box<dyn Any + Send>) -> ! {
    let message = panic_message(payload.as_ref());
    invocation.on_failure(&message).expect(STARTED_ON_ENTRY);

    panic::resume_unwind(payload)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("workload panicked with a non-string payload")
}
