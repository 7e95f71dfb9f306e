//! Error types for the merge crate.

/// Errors that can occur during merge operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MergeError {
    /// An operation was handed arguments it cannot work with, such as fewer
    /// than two values to reduce.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Merge configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
