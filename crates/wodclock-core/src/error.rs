//! Error types for core logic.

use thiserror::Error;
use wodclock_proto::WorkoutId;

/// Errors from parsing interval text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Input was empty or whitespace.
    #[error("empty duration")]
    Empty,

    /// Input did not match `[N day[s]] [HH:]MM:SS`.
    #[error("invalid duration {input:?}: {reason}")]
    Invalid {
        /// The rejected input
        input: String,
        /// What was wrong with it
        reason: &'static str,
    },
}

/// Errors from a workout source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No workout with this identifier.
    #[error("workout not found: {0}")]
    NotFound(WorkoutId),

    /// The source could not be read.
    #[error("workout source unavailable: {0}")]
    Unavailable(String),

    /// The stored definition does not describe a valid workout.
    #[error("invalid workout definition: {0}")]
    Invalid(String),
}
