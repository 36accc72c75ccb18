//! Normalization behavior against the real monotonic clock.
//!
//! Exact durations cannot be asserted here, so every check allows a small tolerance above
//! the expected value and none below it.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use fixed_time::{Deficit, Error, Normalizer, Outcome, PrecisionWaiter, Stopwatch};
use testing::{TOLERANCE, assert_duration_within, simulated_workload, timed, with_watchdog};

const TARGET: Duration = Duration::from_millis(20);

#[test]
fn fast_workload_is_padded_to_target() {
    with_watchdog(|| {
        let normalizer = Normalizer::new(TARGET);

        let (settlement, total) = timed(|| {
            let invocation = normalizer.on_entry();
            simulated_workload(Duration::from_millis(6));
            invocation.on_exit().unwrap()
        });

        assert!(settlement.elapsed() >= Duration::from_millis(6));
        assert!(matches!(settlement.deficit(), Deficit::Slack(_)));
        assert_duration_within(total, TARGET, TOLERANCE);
    });
}

#[test]
fn instant_workload_is_padded_to_target() {
    with_watchdog(|| {
        let normalizer = Normalizer::new(TARGET);

        let (value, total) = timed(|| normalizer.run(|| "cached"));

        assert_eq!(value, "cached");
        assert_duration_within(total, TARGET, TOLERANCE);
    });
}

#[test]
fn slow_workload_is_not_padded() {
    with_watchdog(|| {
        let normalizer = Normalizer::new(TARGET);

        let (settlement, total) = timed(|| {
            let invocation = normalizer.on_entry();
            simulated_workload(Duration::from_millis(35));
            invocation.on_exit().unwrap()
        });

        assert!(settlement.deficit().is_overrun());
        assert_eq!(settlement.wait_request(), Duration::ZERO);
        assert!(total >= Duration::from_millis(35));
        assert_duration_within(total, settlement.elapsed(), TOLERANCE);
    });
}

#[test]
fn exact_target_requests_no_wait() {
    with_watchdog(|| {
        let deficit = Deficit::new(TARGET, TARGET);
        assert_eq!(deficit.wait_request(), Duration::ZERO);

        let waiter = PrecisionWaiter::new();
        let ((), total) = timed(|| waiter.wait(deficit.wait_request()));

        assert!(total < Duration::from_millis(1));
    });
}

#[test]
fn failed_workload_is_padded_and_error_returned() {
    with_watchdog(|| {
        let normalizer = Normalizer::new(TARGET);

        let (result, total) = timed(|| {
            normalizer.run_fallible(|| -> Result<(), String> {
                simulated_workload(Duration::from_millis(1));
                Err("no such model".to_string())
            })
        });

        assert_eq!(result, Err("no such model".to_string()));
        assert_duration_within(total, TARGET, TOLERANCE);
    });
}

#[test]
fn failure_hook_reports_failed_outcome() {
    with_watchdog(|| {
        let normalizer = Normalizer::new(TARGET);

        let (settlement, total) = timed(|| {
            let invocation = normalizer.on_entry();
            invocation.on_failure(&"prediction failed").unwrap()
        });

        assert_eq!(settlement.outcome(), Outcome::Failed);
        assert_duration_within(total, TARGET, TOLERANCE);
    });
}

#[test]
fn panicking_workload_is_padded_and_resumed() {
    with_watchdog(|| {
        let normalizer = Normalizer::new(TARGET);

        let (result, total) = timed(|| {
            panic::catch_unwind(AssertUnwindSafe(|| {
                normalizer.run(|| -> u32 { panic!("workload blew up") })
            }))
        });

        assert!(result.is_err());
        assert_duration_within(total, TARGET, TOLERANCE);
    });
}

#[test]
fn exit_blocks_caller_until_target() {
    // The caller must not regain control before the padding has completed.
    with_watchdog(|| {
        let normalizer = Normalizer::from_millis(30);

        let ((), total) = timed(|| {
            let invocation = normalizer.on_entry();
            invocation.on_exit().unwrap();
        });

        assert!(total >= Duration::from_millis(30));
    });
}

#[test]
fn reused_normalizer_pads_every_invocation() {
    with_watchdog(|| {
        let normalizer = Normalizer::new(TARGET);

        for workload in [0, 3, 9, 15] {
            let ((), total) = timed(|| {
                normalizer.run(|| simulated_workload(Duration::from_millis(workload)));
            });

            assert_duration_within(total, TARGET, TOLERANCE);
        }
    });
}

#[test]
fn wrapped_workload_is_padded_per_call() {
    with_watchdog(|| {
        let classify = Normalizer::new(TARGET).wrap(|name: &str| name.starts_with("cat"));

        let (is_cat, total) = timed(|| classify.call_with("cat_0042.jpg"));

        assert!(is_cat);
        assert_duration_within(total, TARGET, TOLERANCE);
    });
}

#[test]
fn stopwatch_measures_sub_millisecond_intervals() {
    let mut stopwatch = Stopwatch::new();

    stopwatch.start();
    let elapsed = stopwatch.stop().unwrap();

    assert!(elapsed < Duration::from_millis(100));
    assert_eq!(stopwatch.elapsed(), Some(elapsed));
}

#[test]
fn stopwatch_rejects_stop_before_start() {
    let mut stopwatch = Stopwatch::new();

    assert!(matches!(stopwatch.stop(), Err(Error::InvalidSequence)));
    assert_eq!(stopwatch.elapsed(), None);
}

#[test]
fn waiter_is_accurate_for_short_and_long_waits() {
    with_watchdog(|| {
        let waiter = PrecisionWaiter::new();

        for millis in [1, 14, 25] {
            let expected = Duration::from_millis(millis);
            let ((), total) = timed(|| waiter.wait(expected));

            assert_duration_within(total, expected, TOLERANCE);
        }
    });
}
