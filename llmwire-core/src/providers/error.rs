//! Provider error types and handling

use crate::protocol::CodecError;
use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur when talking to an LLM vendor.
///
/// Non-2xx HTTP statuses are not errors; they come back as a normal
/// [`ProviderResponse`](super::ProviderResponse).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection refused, DNS, TLS or body read failure
    #[error("Network error: {0}")]
    Network(String),

    /// The transport gave up waiting
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The request body could not be built
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Transport-level failures that are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Network(_) | ProviderError::Timeout(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_connect() {
            ProviderError::Network(format!("Connection failed: {}", err))
        } else if err.is_builder() {
            ProviderError::InvalidRequest(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}
