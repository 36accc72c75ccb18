use std::time::{Duration, Instant};

use crate::pal::{Platform, PlatformFacade};
use crate::{Error, Result};

/// Measures elapsed time between a [`start()`][Self::start] and a [`stop()`][Self::stop],
/// using the highest resolution monotonic clock available on the platform.
///
/// Calling `start()` again restarts the measurement from the new point in time. Each `stop()`
/// consumes the pending start, so stopping twice in a row is an [`Error::InvalidSequence`].
///
/// A stopwatch holds per-measurement state. Concurrent measurements need one stopwatch each.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fixed_time::Stopwatch;
///
/// let mut stopwatch = Stopwatch::new();
/// stopwatch.start();
/// std::thread::sleep(Duration::from_millis(2));
/// let elapsed = stopwatch.stop().unwrap();
///
/// assert!(elapsed >= Duration::from_millis(2));
/// assert_eq!(stopwatch.elapsed(), Some(elapsed));
/// ```
#[derive(Debug)]
pub struct Stopwatch {
    platform: PlatformFacade,

    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
    elapsed: Option<Duration>,
}

impl Stopwatch {
    /// Creates a stopwatch that has not been started yet.
    #[must_use]
    pub fn new() -> Self {
        Self::with_platform(PlatformFacade::real())
    }

    #[must_use]
    pub(crate) fn with_platform(platform: PlatformFacade) -> Self {
        Self {
            platform,
            started_at: None,
            stopped_at: None,
            elapsed: None,
        }
    }

    /// Records the reference point that the next [`stop()`][Self::stop] measures from.
    pub fn start(&mut self) {
        self.started_at = Some(self.platform.now());
    }

    /// Measures the time elapsed since the last [`start()`][Self::start].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSequence`] if there is no pending start. The previously recorded
    /// measurement, if any, is left untouched in that case.
    pub fn stop(&mut self) -> Result<Duration> {
        let started_at = self.started_at.take().ok_or(Error::InvalidSequence)?;

        let stopped_at = self.platform.now();
        let elapsed = stopped_at.saturating_duration_since(started_at);

        self.stopped_at = Some(stopped_at);
        self.elapsed = Some(elapsed);

        Ok(elapsed)
    }

    /// The last completed measurement, or `None` if the stopwatch has never been stopped
    /// successfully.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Whether the stopwatch has been started and not yet stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// The instant at which the last completed measurement ended.
    pub(crate) fn stopped_at(&self) -> Option<Instant> {
        self.stopped_at
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
