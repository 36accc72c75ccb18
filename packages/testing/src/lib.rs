#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for tests, examples and benchmarks in the `fixed_time` workspace.
//!
//! Tests against the real clock cannot assert exact durations. Instead they check that a
//! measured duration lands in a window: never below the expected value and not more than a
//! tolerance above it.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// How far above its target a padded invocation may end before a test considers it a failure.
pub const TOLERANCE: Duration = Duration::from_millis(5);

/// How long a test may run before the watchdog declares it hung.
const WATCHDOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs a test with a timeout to prevent infinite hangs.
///
/// Timing code that miscomputes a deadline tends to wait forever instead of failing. If the test
/// takes longer than the timeout to complete, this panics instead of stalling the build.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the watchdog is disabled and
/// the test function is executed directly, so that mutation testing can detect hanging mutations.
///
/// # Panics
///
/// Panics if the test exceeds the timeout (when not in mutation testing mode) or if the test
/// itself panics.
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        let result = test_fn();
        // If this fails, the receiver has already timed out.
        drop(tx.send(result));
    });

    match rx.recv_timeout(WATCHDOG_TIMEOUT) {
        Ok(result) => {
            test_handle.join().expect("test thread should not panic");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test exceeded {WATCHDOG_TIMEOUT:?} timeout");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("test thread disconnected unexpectedly"),
            Err(e) => std::panic::resume_unwind(e),
        },
    }
}

/// Measures how long `f` takes, returning its result together with the elapsed time.
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();

    (result, start.elapsed())
}

/// Simulates a workload that takes `duration` of wall-clock time.
///
/// The bulk of the time is slept away and the tail is spun, so the workload does not finish
/// early and rarely finishes late, even on schedulers with coarse sleep granularity.
pub fn simulated_workload(duration: Duration) {
    let deadline = Instant::now()
        .checked_add(duration)
        .expect("simulated workloads are short");

    if let Some(bulk) = duration.checked_sub(Duration::from_millis(2)) {
        thread::sleep(bulk);
    }

    while Instant::now() < deadline {
        std::hint::spin_loop();
    }
}

/// Asserts that `actual` is at least `expected` and at most `expected + tolerance`.
///
/// # Panics
///
/// Panics with a descriptive message if `actual` is outside the window.
#[track_caller]
pub fn assert_duration_within(actual: Duration, expected: Duration, tolerance: Duration) {
    let upper = expected.saturating_add(tolerance);

    assert!(
        actual >= expected && actual <= upper,
        "duration {actual:?} is outside of [{expected:?}, {upper:?}]"
    );
}
