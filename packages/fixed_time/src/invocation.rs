use std::fmt::Display;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::{Deficit, Normalizer, Result, Stopwatch};

/// One in-flight invocation of a workload under a [`Normalizer`].
///
/// Created by [`Normalizer::on_entry()`], which starts a stopwatch owned by this invocation.
/// The invocation is settled by exactly one of [`on_exit()`][Self::on_exit] or
/// [`on_failure()`][Self::on_failure], which measure the workload, block the caller for the
/// remaining deficit and report what happened.
///
/// Every invocation owns its own stopwatch, so any number of invocations of the same
/// normalizer can be in flight at the same time, on any threads.
#[derive(Debug)]
#[must_use = "the duration is only normalized once the invocation is settled via on_exit() or on_failure()"]
pub struct Invocation<'n> {
    normalizer: &'n Normalizer,
    stopwatch: Stopwatch,
}

impl<'n> Invocation<'n> {
    pub(crate) fn begin(normalizer: &'n Normalizer) -> Self {
        let mut stopwatch = Stopwatch::with_platform(normalizer.platform().clone());
        stopwatch.start();

        Self {
            normalizer,
            stopwatch,
        }
    }

    /// Settles an invocation whose workload completed normally.
    ///
    /// Blocks the calling thread until the target duration has passed since
    /// [`Normalizer::on_entry()`], unless the workload already took longer than that.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSequence`][crate::Error::InvalidSequence] if the measurement
    /// could not be completed. No padding is performed in that case.
    pub fn on_exit(self) -> Result<Settlement> {
        self.settle(None)
    }

    /// Settles an invocation whose workload failed.
    ///
    /// The failure is logged and then the invocation is padded exactly like a successful one,
    /// so that failed and successful invocations cannot be told apart by their duration. The
    /// caller remains responsible for propagating the error itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSequence`][crate::Error::InvalidSequence] if the measurement
    /// could not be completed. No padding is performed in that case.
    pub fn on_failure(self, error: &dyn Display) -> Result<Settlement> {
        self.settle(Some(error))
    }

    fn settle(mut self, failure: Option<&dyn Display>) -> Result<Settlement> {
        let elapsed = self.stopwatch.stop()?;
        let stopped_at = self
            .stopwatch
            .stopped_at()
            .expect("a successful stop always records the stop instant");

        let target = self.normalizer.target();
        let deficit = Deficit::new(target, elapsed);

        // Logging happens before the wait. The wait is anchored to the stop instant, so the
        // time spent here is absorbed into the padding.
        let outcome = match failure {
            Some(error) => {
                warn!(%error, ?elapsed, "workload failed, normalizing its duration regardless");
                Outcome::Failed
            }
            None => Outcome::Completed,
        };

        if let Deficit::Overrun(overrun) = deficit {
            debug!(?elapsed, ?target, ?overrun, "workload overran the target duration");
        }

        let wait_request = deficit.wait_request();

        if !wait_request.is_zero() {
            match stopped_at.checked_add(wait_request) {
                Some(deadline) => self.normalizer.waiter().wait_until(deadline),
                // Past the end of the platform clock; the waiter sleeps without a deadline.
                None => self.normalizer.waiter().wait(wait_request),
            }
        }

        trace!(?elapsed, ?wait_request, ?outcome, "invocation settled");

        Ok(Settlement {
            elapsed,
            deficit,
            wait_request,
            outcome,
        })
    }
}

/// How the workload of a settled invocation terminated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Outcome {
    /// The workload returned normally.
    Completed,

    /// The workload returned an error or panicked.
    Failed,
}

/// The record of a settled invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settlement {
    elapsed: Duration,
    deficit: Deficit,
    wait_request: Duration,
    outcome: Outcome,
}

impl Settlement {
    /// How long the workload itself took.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The difference between the target duration and [`elapsed()`][Self::elapsed].
    #[must_use]
    pub fn deficit(&self) -> Deficit {
        self.deficit
    }

    /// How long the caller was held back after the workload finished.
    #[must_use]
    pub fn wait_request(&self) -> Duration {
        self.wait_request
    }

    /// How the workload terminated.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}
