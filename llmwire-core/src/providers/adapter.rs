//! Provider trait and response type
//!
//! Every vendor client and the reliability wrapper implement [`Provider`],
//! so they compose freely and can be swapped for test doubles.

use crate::protocol::sse::SseParser;
use crate::protocol::{ApiType, RequestConfig, SseEvent, StreamEvent};
use crate::providers::error::ProviderResult;
use async_trait::async_trait;
use bytes::Bytes;
use std::borrow::Cow;

/// Raw HTTP outcome of a provider call.
///
/// The body is single-owner. A body built from a `&'static` slice is never
/// copied; an owned body is released exactly once when the response drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ProviderResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Wrap a static body without allocating
    pub fn from_static(status: u16, body: &'static [u8]) -> Self {
        Self {
            status,
            body: Bytes::from_static(body),
        }
    }

    /// True for statuses in `[200, 300)`
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Lossy UTF-8 view of the body
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Split an SSE body into frames
    pub fn sse_events(&self) -> Vec<SseEvent> {
        SseParser::new().feed(&self.body)
    }

    /// Decode an SSE body into canonical events with the codec for `api`
    pub fn events(&self, api: ApiType) -> Vec<StreamEvent> {
        super::decode_stream(api, &self.body)
    }
}

/// Core provider trait that all vendor clients implement
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short vendor name used in logs, e.g. `anthropic` or `groq`
    fn name(&self) -> &str;

    /// Send one conversation turn.
    ///
    /// `messages_json` is a JSON array already in the vendor's message
    /// shape; `tools_json` is an optional JSON array of tool definitions.
    async fn send_message(
        &self,
        config: &RequestConfig,
        messages_json: &str,
        tools_json: Option<&str>,
    ) -> ProviderResult<ProviderResponse>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn send_message(
        &self,
        config: &RequestConfig,
        messages_json: &str,
        tools_json: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        (**self).send_message(config, messages_json, tools_json).await
    }
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn send_message(
        &self,
        config: &RequestConfig,
        messages_json: &str,
        tools_json: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        (**self).send_message(config, messages_json, tools_json).await
    }
}
