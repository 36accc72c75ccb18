use std::hint;
use std::thread;
use std::time::{Duration, Instant};

use crate::pal::Platform;

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the real operating system.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

/// The platform that the build is targeting.
///
/// `std::time::Instant` is already backed by the best monotonic source on every supported
/// target (`CLOCK_MONOTONIC` on Linux, `QueryPerformanceCounter` on Windows), so there is no
/// need to go through FFI bindings here.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }

    #[cfg_attr(test, mutants::skip)] // A missing spin hint only changes power draw.
    fn spin_hint(&self) {
        hint::spin_loop();
    }
}
