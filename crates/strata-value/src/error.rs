use thiserror::Error;

/// Errors produced while constructing tree values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Convenience alias for value results.
pub type ValueResult<T> = Result<T, ValueError>;
