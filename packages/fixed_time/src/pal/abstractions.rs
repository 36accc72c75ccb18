use std::fmt::Debug;
use std::time::{Duration, Instant};

#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Reads the highest resolution monotonic clock the platform offers.
    fn now(&self) -> Instant;

    /// Blocks the current thread for at least `duration`, with the granularity of the
    /// operating system scheduler (which may overshoot by a scheduler tick or more).
    fn sleep(&self, duration: Duration);

    /// Called once per iteration of a busy-wait loop.
    fn spin_hint(&self);
}
