use std::time::{Duration, Instant};

use crate::pal::{Platform, PlatformFacade};

/// The default tail of every wait that is spent spinning instead of sleeping.
///
/// Windows schedules threads on a ~15.6 ms timer tick by default, so a coarse sleep there can
/// overshoot by a whole tick. Other supported platforms have high resolution timers where a
/// sleep rarely overshoots by more than a fraction of a millisecond.
pub const DEFAULT_SPIN_MARGIN: Duration = if cfg!(windows) {
    Duration::from_millis(16)
} else {
    Duration::from_millis(2)
};

/// Blocks the calling thread for a requested duration with sub-millisecond accuracy.
///
/// A single OS sleep call is not precise enough: it may overshoot by one or more scheduler
/// ticks. The waiter therefore sleeps for all but the final [`spin_margin`][Self::spin_margin]
/// of the wait, yielding the processor for the bulk of it, and then spins on the monotonic clock
/// until the deadline. Waits no longer than the spin margin are spun in full.
///
/// Spinning trades processor time for precision. A larger spin margin tolerates coarser
/// schedulers at the cost of burning more processor time per wait.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use fixed_time::PrecisionWaiter;
///
/// let waiter = PrecisionWaiter::new();
///
/// let before = Instant::now();
/// waiter.wait(Duration::from_millis(5));
///
/// assert!(before.elapsed() >= Duration::from_millis(5));
/// ```
#[derive(Clone, Debug)]
pub struct PrecisionWaiter {
    platform: PlatformFacade,
    spin_margin: Duration,
}

impl PrecisionWaiter {
    /// Creates a waiter with [`DEFAULT_SPIN_MARGIN`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_spin_margin(DEFAULT_SPIN_MARGIN)
    }

    /// Creates a waiter that spins for the final `spin_margin` of every wait.
    ///
    /// A margin of zero disables spinning beyond the first deadline check after sleeping.
    #[must_use]
    pub fn with_spin_margin(spin_margin: Duration) -> Self {
        Self::with_platform(PlatformFacade::real(), spin_margin)
    }

    #[must_use]
    pub(crate) fn with_platform(platform: PlatformFacade, spin_margin: Duration) -> Self {
        Self {
            platform,
            spin_margin,
        }
    }

    /// The tail of each wait that is spent spinning instead of sleeping.
    #[must_use]
    pub fn spin_margin(&self) -> Duration {
        self.spin_margin
    }

    /// Blocks the calling thread for `duration`.
    ///
    /// Returns immediately, without reading the clock, if `duration` is zero. Negative
    /// durations cannot be expressed; a workload that overran its target has nothing to wait for
    /// and requests a zero wait.
    ///
    /// A `duration` so long that its deadline cannot be represented by the platform clock is
    /// slept in full, without the spinning tail.
    pub fn wait(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        match self.platform.now().checked_add(duration) {
            Some(deadline) => self.wait_until(deadline),
            None => self.platform.sleep(duration),
        }
    }

    /// Blocks the calling thread until the monotonic clock reaches `deadline`.
    ///
    /// Returns immediately if the deadline has already passed.
    pub fn wait_until(&self, deadline: Instant) {
        let remaining = deadline.saturating_duration_since(self.platform.now());

        if remaining.is_zero() {
            return;
        }

        if remaining > self.spin_margin {
            self.platform
                .sleep(remaining.saturating_sub(self.spin_margin));
        }

        while self.platform.now() < deadline {
            self.platform.spin_hint();
        }
    }
}

impl Default for PrecisionWaiter {
    fn default() -> Self {
        Self::new()
    }
}
