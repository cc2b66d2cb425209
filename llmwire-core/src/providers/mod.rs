//! Vendor providers and the reliability layer
//!
//! Each vendor module pairs a request builder (`converter`) with a stream
//! translator (`streaming`) and a [`Provider`] client. [`ReliableProvider`]
//! wraps any of them with retry handling.

pub mod adapter;
pub mod anthropic;
pub mod compat;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod reliable;
pub mod retry;

pub use adapter::{Provider, ProviderResponse};
pub use anthropic::AnthropicClient;
pub use compat::{builtin_vendors, CompatClient, CompatConfig};
pub use error::{ProviderError, ProviderResult};
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use reliable::ReliableProvider;
pub use retry::{classify_status, is_retryable_status, RetryConfig, RetryState, StatusClass};

use crate::http::HttpTransport;
use crate::protocol::{ApiType, SseEvent, SseParser, StreamEvent};
use std::sync::Arc;
use tracing::debug;

/// Translate one SSE frame using the codec for `api`
pub fn parse_stream_event(api: ApiType, event: &SseEvent) -> Option<StreamEvent> {
    match api {
        ApiType::Anthropic => anthropic::parse_stream_event(event),
        ApiType::OpenAI | ApiType::OpenAICompatible => openai::parse_stream_event(event),
        ApiType::Gemini => gemini::parse_stream_event(event),
    }
}

/// Decode a complete SSE response body into canonical events, in order.
///
/// Frames the codec does not recognize are skipped.
pub fn decode_stream(api: ApiType, body: &[u8]) -> Vec<StreamEvent> {
    let mut parser = SseParser::new();
    let frames = parser.feed(body);
    let frame_count = frames.len();
    let events: Vec<StreamEvent> = frames
        .iter()
        .filter_map(|frame| parse_stream_event(api, frame))
        .collect();
    debug!(
        api = %api,
        frames = frame_count,
        events = events.len(),
        "decoded stream"
    );
    events
}

impl ApiType {
    /// Build the client for this API over `transport`.
    ///
    /// `compat` is required for [`ApiType::OpenAICompatible`] and ignored
    /// otherwise.
    pub fn create_client(
        self,
        transport: Arc<dyn HttpTransport>,
        compat: Option<CompatConfig>,
    ) -> ProviderResult<Box<dyn Provider>> {
        let client: Box<dyn Provider> = match self {
            ApiType::Anthropic => Box::new(AnthropicClient::new(transport)),
            ApiType::OpenAI => Box::new(OpenAIClient::new(transport)),
            ApiType::Gemini => Box::new(GeminiClient::new(transport)),
            ApiType::OpenAICompatible => {
                let compat = compat.ok_or_else(|| {
                    ProviderError::Configuration(
                        "openai_compatible requires a vendor descriptor".to_string(),
                    )
                })?;
                Box::new(CompatClient::new(transport, compat))
            }
        };
        Ok(client)
    }
}
