use std::time::Duration;

/// The difference between the target duration of an invocation and the time its workload
/// actually took.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fixed_time::Deficit;
///
/// let slack = Deficit::new(Duration::from_millis(20), Duration::from_millis(6));
/// assert_eq!(slack, Deficit::Slack(Duration::from_millis(14)));
/// assert_eq!(slack.wait_request(), Duration::from_millis(14));
///
/// let overrun = Deficit::new(Duration::from_millis(20), Duration::from_millis(35));
/// assert_eq!(overrun, Deficit::Overrun(Duration::from_millis(15)));
/// assert_eq!(overrun.wait_request(), Duration::ZERO);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Deficit {
    /// The workload finished early. The contained duration is left to pad.
    Slack(Duration),

    /// The workload took longer than the target by the contained duration.
    ///
    /// Time cannot be taken back, so such an invocation is not padded and its duration is
    /// observable.
    Overrun(Duration),
}

impl Deficit {
    /// Compares the time a workload took against the target duration.
    #[must_use]
    pub fn new(target: Duration, elapsed: Duration) -> Self {
        target.checked_sub(elapsed).map_or_else(
            || Self::Overrun(elapsed.saturating_sub(target)),
            Self::Slack,
        )
    }

    /// How long the caller still needs to be held back to reach the target duration.
    ///
    /// This is zero both for an overrun and for a workload that took exactly the target
    /// duration.
    #[must_use]
    pub fn wait_request(&self) -> Duration {
        match self {
            Self::Slack(slack) => *slack,
            Self::Overrun(_) => Duration::ZERO,
        }
    }

    /// Whether the workload took longer than the target duration.
    #[must_use]
    pub fn is_overrun(&self) -> bool {
        matches!(self, Self::Overrun(_))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn exact_target_is_zero_slack() {
        let deficit = Deficit::new(Duration::from_millis(20), Duration::from_millis(20));

        assert_eq!(deficit, Deficit::Slack(Duration::ZERO));
        assert_eq!(deficit.wait_request(), Duration::ZERO);
        assert!(!deficit.is_overrun());
    }

    #[test]
    fn zero_target_overruns_with_any_work() {
        let deficit = Deficit::new(Duration::ZERO, Duration::from_nanos(1));

        assert_eq!(deficit, Deficit::Overrun(Duration::from_nanos(1)));
        assert!(deficit.is_overrun());
    }

    #[test]
    fn sub_millisecond_slack_is_preserved() {
        let deficit = Deficit::new(Duration::from_millis(1), Duration::from_micros(250));

        assert_eq!(deficit.wait_request(), Duration::from_micros(750));
    }
}
