use thiserror::Error;

/// Errors raised when the timing mechanism is used out of order.
///
/// Failures of the workload itself are not represented here. They are reported through
/// [`Outcome::Failed`][crate::Outcome::Failed] and returned to the caller unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A [`Stopwatch`][crate::Stopwatch] was stopped without a preceding start.
    ///
    /// No elapsed time is produced for such a measurement.
    #[error("stopwatch was stopped without a preceding start")]
    InvalidSequence,
}

/// A specialized `Result` type for timing operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
