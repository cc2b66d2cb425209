//! Gemini client implementation

use super::converter::build_request_body;
use crate::http::{json_content_type, HttpTransport};
use crate::protocol::json::{BodyWriter, DEFAULT_BODY_LIMIT};
use crate::protocol::RequestConfig;
use crate::providers::adapter::{Provider, ProviderResponse};
use crate::providers::error::ProviderResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use url::form_urlencoded;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const API_VERSION: &str = "v1beta";

/// Build the `generateContent` / `streamGenerateContent` URL.
///
/// The API key is sent as the `key` query parameter. Streaming requests add
/// `alt=sse` so the response is framed as Server-Sent Events.
pub fn build_request_url(base: &str, model: &str, api_key: &str, stream: bool) -> String {
    let action = if stream {
        "streamGenerateContent"
    } else {
        "generateContent"
    };
    let mut query = form_urlencoded::Serializer::new(String::new());
    if stream {
        query.append_pair("alt", "sse");
    }
    query.append_pair("key", api_key);

    format!(
        "{}/{}/models/{}:{}?{}",
        base.trim_end_matches('/'),
        API_VERSION,
        model,
        action,
        query.finish()
    )
}

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiClient {
    transport: Arc<dyn HttpTransport>,
    body_limit: usize,
}

impl GeminiClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn endpoint(&self, config: &RequestConfig) -> String {
        let base = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        build_request_url(
            base,
            &config.model,
            config.api_key.expose_secret(),
            config.stream,
        )
    }
}

#[async_trait]
impl Provider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn send_message(
        &self,
        config: &RequestConfig,
        messages_json: &str,
        tools_json: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        let mut buf = BodyWriter::with_limit(self.body_limit);
        build_request_body(&mut buf, config, messages_json, tools_json)?;

        let url = self.endpoint(config);
        let headers = [json_content_type()];
        // The URL carries the key; log the model instead
        debug!(
            provider = "gemini",
            model = %config.model,
            stream = config.stream,
            body_bytes = buf.len(),
            "sending message"
        );

        if config.stream {
            self.transport
                .post_sse(&url, &headers, buf.into_string())
                .await
        } else {
            self.transport.post(&url, &headers, buf.into_string()).await
        }
    }
}
