//! Codec error types for request-body construction

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while building vendor wire JSON
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The output buffer cannot hold the body being written
    #[error("No space left in {limit} byte request buffer (needed {needed})")]
    NoSpace { limit: usize, needed: usize },

    /// The caller-supplied messages JSON is not an array
    #[error("Messages JSON must be an array: {0}")]
    InvalidMessages(String),
}
