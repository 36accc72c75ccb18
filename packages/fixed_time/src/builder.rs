use std::time::Duration;

use crate::pal::PlatformFacade;
use crate::{DEFAULT_SPIN_MARGIN, Normalizer, PrecisionWaiter};

/// Configures a [`Normalizer`] before it is created.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fixed_time::Normalizer;
///
/// let normalizer = Normalizer::builder(Duration::from_millis(50))
///     .spin_margin(Duration::from_millis(16))
///     .build();
///
/// assert_eq!(normalizer.target(), Duration::from_millis(50));
/// assert_eq!(normalizer.spin_margin(), Duration::from_millis(16));
/// ```
#[derive(Debug)]
#[must_use]
pub struct NormalizerBuilder {
    target: Duration,
    spin_margin: Duration,
    platform: PlatformFacade,
}

impl NormalizerBuilder {
    pub(crate) fn new(target: Duration) -> Self {
        Self {
            target,
            spin_margin: DEFAULT_SPIN_MARGIN,
            platform: PlatformFacade::real(),
        }
    }

    /// Sets the tail of each padding wait that is spent spinning instead of sleeping.
    ///
    /// Defaults to [`DEFAULT_SPIN_MARGIN`]. The margin should exceed the typical oversleep of
    /// the operating system scheduler, otherwise padded invocations end late.
    pub fn spin_margin(mut self, spin_margin: Duration) -> Self {
        self.spin_margin = spin_margin;
        self
    }

    #[cfg(test)]
    pub(crate) fn platform(mut self, platform: impl Into<PlatformFacade>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Creates the normalizer.
    #[must_use]
    pub fn build(self) -> Normalizer {
        let waiter = PrecisionWaiter::with_platform(self.platform.clone(), self.spin_margin);

        Normalizer::from_parts(self.target, waiter, self.platform)
    }
}
