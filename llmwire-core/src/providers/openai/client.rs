//! OpenAI client implementation

use super::converter::build_request_body;
use crate::http::{build_url, json_content_type, Header, HttpTransport};
use crate::protocol::json::{BodyWriter, DEFAULT_BODY_LIMIT};
use crate::protocol::RequestConfig;
use crate::providers::adapter::{Provider, ProviderResponse};
use crate::providers::error::ProviderResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// OpenAI Chat Completions client
#[derive(Clone)]
pub struct OpenAIClient {
    transport: Arc<dyn HttpTransport>,
    body_limit: usize,
}

impl OpenAIClient {
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
        build_url(base, COMPLETIONS_PATH)
    }

    pub fn headers(&self, api_key: &str) -> Vec<Header> {
        vec![
            Header::new("authorization", format!("Bearer {}", api_key)),
            json_content_type(),
        ]
    }
}

#[async_trait]
impl Provider for OpenAIClient {
    fn name(&self) -> &str {
        "openai"
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
        let headers = self.headers(config.api_key.expose_secret());
        debug!(
            provider = "openai",
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
