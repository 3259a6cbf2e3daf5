use thiserror::Error;

/// Errors raised while validating matching input
///
/// All of these are detected before the deferred-acceptance loop starts.
/// An unstable result is never reported through this type; see
/// [`crate::core::stability::StabilityReport`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchingError {
    #[error("Score matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("Score matrix is not symmetric at ({row}, {col}): {forward} vs {backward}")]
    Asymmetric {
        row: usize,
        col: usize,
        forward: f64,
        backward: f64,
    },

    #[error("Invalid score at ({row}, {col}): {value}")]
    InvalidScore { row: usize, col: usize, value: f64 },

    #[error("Length mismatch for {field}: expected {expected}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown gender identity: {0}")]
    UnknownGender(String),

    #[error("Unknown gender preference: {0}")]
    UnknownPreference(String),

    #[error("Invalid role partition: {0}")]
    InvalidPartition(String),

    #[error("Invalid preferences: {0}")]
    InvalidPreferences(String),

    #[error("Too many participants: {actual} (max {max})")]
    TooManyParticipants { actual: usize, max: usize },
}

pub type MatchingResult<T> = Result<T, MatchingError>;
