//! HTTP transport module
//!
//! Vendor clients talk to the network only through [`HttpTransport`], so the
//! actual socket I/O can be swapped for a test double. The default
//! implementation is the reqwest-backed [`client::HttpClient`].

pub mod client;
pub mod error;

use crate::providers::adapter::ProviderResponse;
use crate::providers::error::ProviderResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::HttpClient;

/// A single request header. Headers are passed as an ordered list and sent
/// in that order; duplicates are not merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The content-type header every vendor body is sent with
pub fn json_content_type() -> Header {
    Header::new("content-type", "application/json")
}

/// Join `base` and `path` with exactly one `/` between them
pub fn build_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Trait for HTTP executors
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` and return the full response
    async fn post(
        &self,
        url: &str,
        headers: &[Header],
        body: String,
    ) -> ProviderResult<ProviderResponse>;

    /// POST `body` expecting a `text/event-stream` response; the complete
    /// SSE text is returned as the body
    async fn post_sse(
        &self,
        url: &str,
        headers: &[Header],
        body: String,
    ) -> ProviderResult<ProviderResponse>;
}
