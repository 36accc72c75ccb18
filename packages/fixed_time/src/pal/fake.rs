//! Fake platform with a virtual clock, for testing timing logic deterministically.

#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::pal::Platform;

/// Internal state for the fake platform that can be shared between clones.
#[derive(Debug)]
struct FakePlatformState {
    now: Instant,

    // Added on top of every requested sleep, simulating coarse scheduler granularity.
    sleep_overshoot: Duration,

    // How far the virtual clock moves on each spin hint.
    spin_step: Duration,

    sleeps: Vec<Duration>,
    spins: u64,
}

/// Fake implementation of the platform abstraction.
///
/// Time only moves when a test calls [`advance()`][Self::advance] or when the code under test
/// sleeps or spins. Multiple clones of the same `FakePlatform` share the same virtual clock, so a
/// workload closure holding a clone can simulate taking a specific amount of time.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    pub(crate) const DEFAULT_SPIN_STEP: Duration = Duration::from_micros(50);

    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                now: Instant::now(),
                sleep_overshoot: Duration::ZERO,
                spin_step: Self::DEFAULT_SPIN_STEP,
                sleeps: Vec::new(),
                spins: 0,
            })),
        }
    }

    pub(crate) fn with_sleep_overshoot(self, overshoot: Duration) -> Self {
        self.with_state(|state| state.sleep_overshoot = overshoot);
        self
    }

    /// Moves the virtual clock forward, as if a workload had been running for `duration`.
    pub(crate) fn advance(&self, duration: Duration) {
        self.with_state(|state| state.advance(duration));
    }

    /// Every coarse sleep requested so far, in order.
    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.with_state(|state| state.sleeps.clone())
    }

    pub(crate) fn spins(&self) -> u64 {
        self.with_state(|state| state.spins)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakePlatformState) -> R) -> R {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        f(&mut state)
    }
}

impl FakePlatformState {
    // A duration beyond the range of `Instant` leaves the virtual clock where it is.
    fn advance(&mut self, duration: Duration) {
        if let Some(now) = self.now.checked_add(duration) {
            self.now = now;
        }
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> Instant {
        self.with_state(|state| state.now)
    }

    fn sleep(&self, duration: Duration) {
        self.with_state(|state| {
            state.sleeps.push(duration);
            let overshoot = state.sleep_overshoot;
            state.advance(duration.saturating_add(overshoot));
        });
    }

    fn spin_hint(&self) {
        self.with_state(|state| {
            state.spins = state.spins.saturating_add(1);
            let step = state.spin_step;
            state.advance(step);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_virtual_clock() {
        let platform = FakePlatform::new();
        let clone = platform.clone();
        let start = platform.now();

        clone.advance(Duration::from_millis(3));

        assert_eq!(
            platform.now().duration_since(start),
            Duration::from_millis(3)
        );
    }

    #[test]
    fn sleep_applies_overshoot_and_is_recorded() {
        let platform = FakePlatform::new().with_sleep_overshoot(Duration::from_millis(1));
        let start = platform.now();

        platform.sleep(Duration::from_millis(10));

        assert_eq!(platform.sleeps(), vec![Duration::from_millis(10)]);
        assert_eq!(
            platform.now().duration_since(start),
            Duration::from_millis(11)
        );
    }

    #[test]
    fn spin_advances_by_step() {
        let platform = FakePlatform::new();
        let start = platform.now();

        platform.spin_hint();
        platform.spin_hint();

        assert_eq!(platform.spins(), 2);
        assert_eq!(
            platform.now().duration_since(start),
            FakePlatform::DEFAULT_SPIN_STEP * 2
        );
    }
}
