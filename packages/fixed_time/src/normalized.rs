use std::fmt::{self, Debug};

use crate::Normalizer;

/// A workload decorated with a [`Normalizer`], created by [`Normalizer::wrap()`].
///
/// Every call goes through [`Normalizer::run()`], so the decorated workload can be handed to
/// code that should not need to know about timing normalization.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use fixed_time::Normalizer;
///
/// let classify = Normalizer::from_millis(10).wrap(|path: &str| path.ends_with(".png"));
///
/// let before = Instant::now();
/// assert!(classify.call_with("cat.png"));
/// assert!(!classify.call_with("dog.jpg"));
/// assert!(before.elapsed() >= Duration::from_millis(20));
/// ```
pub struct Normalized<F> {
    normalizer: Normalizer,
    workload: F,
}

impl<F> Normalized<F> {
    pub(crate) fn new(normalizer: Normalizer, workload: F) -> Self {
        Self {
            normalizer,
            workload,
        }
    }

    /// Invokes a workload that takes no input.
    pub fn call<R>(&self) -> R
    where
        F: Fn() -> R,
    {
        self.normalizer.run(&self.workload)
    }

    /// Invokes a workload with `input`.
    pub fn call_with<A, R>(&self, input: A) -> R
    where
        F: Fn(A) -> R,
    {
        self.normalizer.run(|| (self.workload)(input))
    }

    /// The normalizer applied to every call.
    #[must_use]
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }
}

impl<F> Debug for Normalized<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalized")
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}
