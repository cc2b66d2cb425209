//! HTTP error mapping utilities

use crate::providers::error::ProviderError;
use tracing::{error, warn};
use uuid::Uuid;

/// Map a reqwest send/read failure to a [`ProviderError`], tagging the
/// message with the request id for correlation.
///
/// The URL is stripped from the error first; Gemini carries the API key in
/// the query string. Callers pass the already redacted `url` for logging.
pub fn map_transport_error(err: reqwest::Error, url: &str, request_id: Uuid) -> ProviderError {
    let err = err.without_url();
    if err.is_timeout() {
        warn!(%request_id, url, "request timed out");
        ProviderError::Timeout(format!("{} [request_id: {}]", err, request_id))
    } else if err.is_connect() {
        error!(%request_id, url, error = %err, "connection failed");
        ProviderError::Network(format!(
            "Connection failed: {} [request_id: {}]",
            err, request_id
        ))
    } else if err.is_builder() {
        ProviderError::InvalidRequest(format!("{} [request_id: {}]", err, request_id))
    } else {
        error!(%request_id, url, error = %err, "request error");
        ProviderError::Network(format!("{} [request_id: {}]", err, request_id))
    }
}

/// Strip the query string from a URL before it is logged.
///
/// Gemini carries the API key as a query parameter.
pub fn redact_query(url: &str) -> &str {
    url.split_once('?').map(|(base, _)| base).unwrap_or(url)
}
