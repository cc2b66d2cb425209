//! OpenAI-compatible vendors
//!
//! Groq, Ollama, OpenRouter and friends accept the OpenAI Chat Completions
//! wire format. A [`CompatConfig`] records how each one differs (base URL,
//! path, auth header, feature support) and [`CompatClient`] drives the
//! OpenAI codec with those differences applied.

use crate::http::{build_url, json_content_type, Header, HttpTransport};
use crate::protocol::json::{BodyWriter, DEFAULT_BODY_LIMIT};
use crate::protocol::{CodecResult, RequestConfig};
use crate::providers::adapter::{Provider, ProviderResponse};
use crate::providers::error::ProviderResult;
use crate::providers::openai;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

fn default_completions_path() -> String {
    openai::COMPLETIONS_PATH.to_string()
}

fn default_api_key_header() -> String {
    "authorization".to_string()
}

fn default_api_key_prefix() -> String {
    "Bearer ".to_string()
}

fn default_true() -> bool {
    true
}

/// Descriptor for one OpenAI-compatible vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatConfig {
    pub provider_name: String,
    pub base_url: String,
    #[serde(default = "default_completions_path")]
    pub completions_path: String,
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    /// Prepended verbatim to the key; empty means the raw key is sent
    #[serde(default = "default_api_key_prefix")]
    pub api_key_prefix: String,
    #[serde(default = "default_true")]
    pub supports_streaming: bool,
    #[serde(default = "default_true")]
    pub supports_tools: bool,
}

impl CompatConfig {
    /// A descriptor with the OpenAI defaults for everything but the name and
    /// base URL
    pub fn new(provider_name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            base_url: base_url.into(),
            completions_path: default_completions_path(),
            api_key_header: default_api_key_header(),
            api_key_prefix: default_api_key_prefix(),
            supports_streaming: true,
            supports_tools: true,
        }
    }

    pub fn with_completions_path(mut self, path: impl Into<String>) -> Self {
        self.completions_path = path.into();
        self
    }

    pub fn with_api_key_header(mut self, header: impl Into<String>) -> Self {
        self.api_key_header = header.into();
        self
    }

    pub fn with_api_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_key_prefix = prefix.into();
        self
    }

    pub fn with_streaming(mut self, supported: bool) -> Self {
        self.supports_streaming = supported;
        self
    }

    pub fn with_tools(mut self, supported: bool) -> Self {
        self.supports_tools = supported;
        self
    }

    /// Look up a built-in vendor by name (case-insensitive)
    pub fn builtin(name: &str) -> Option<Self> {
        builtin_vendors()
            .into_iter()
            .find(|v| v.provider_name.eq_ignore_ascii_case(name))
    }

    /// `prefix ++ key`, with no separator added
    pub fn auth_header_value(&self, api_key: &str) -> String {
        format!("{}{}", self.api_key_prefix, api_key)
    }

    pub fn auth_header(&self, api_key: &str) -> Header {
        Header::new(self.api_key_header.clone(), self.auth_header_value(api_key))
    }

    /// The request config as this vendor will see it. Streaming is turned off
    /// for vendors that cannot stream; the caller's config is left untouched.
    pub fn effective_config<'a>(&self, config: &'a RequestConfig) -> Cow<'a, RequestConfig> {
        if config.stream && !self.supports_streaming {
            Cow::Owned(config.clone().with_stream(false))
        } else {
            Cow::Borrowed(config)
        }
    }

    /// `tools_json`, or `None` if the vendor has no tool support
    pub fn effective_tools<'t>(&self, tools_json: Option<&'t str>) -> Option<&'t str> {
        tools_json.filter(|_| self.supports_tools)
    }

    /// Build an OpenAI-format body with this vendor's feature limits applied
    pub fn build_request_body(
        &self,
        buf: &mut BodyWriter,
        config: &RequestConfig,
        messages_json: &str,
        tools_json: Option<&str>,
    ) -> CodecResult<()> {
        let config = self.effective_config(config);
        openai::build_request_body(buf, &config, messages_json, self.effective_tools(tools_json))
    }
}

/// Vendors known to speak the OpenAI Chat Completions dialect
pub fn builtin_vendors() -> Vec<CompatConfig> {
    vec![
        CompatConfig::new("groq", "https://api.groq.com/openai"),
        CompatConfig::new("ollama", "http://localhost:11434").with_api_key_prefix(""),
        CompatConfig::new("openrouter", "https://openrouter.ai/api"),
        CompatConfig::new("together", "https://api.together.xyz"),
        CompatConfig::new("deepseek", "https://api.deepseek.com")
            .with_completions_path("/chat/completions"),
        CompatConfig::new("mistral", "https://api.mistral.ai"),
        CompatConfig::new("xai", "https://api.x.ai"),
    ]
}

/// Client for any OpenAI-compatible vendor
#[derive(Clone)]
pub struct CompatClient {
    transport: Arc<dyn HttpTransport>,
    compat: CompatConfig,
    body_limit: usize,
}

impl CompatClient {
    pub fn new(transport: Arc<dyn HttpTransport>, compat: CompatConfig) -> Self {
        Self {
            transport,
            compat,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn compat(&self) -> &CompatConfig {
        &self.compat
    }

    pub fn endpoint(&self, config: &RequestConfig) -> String {
        let base = config.base_url.as_deref().unwrap_or(&self.compat.base_url);
        build_url(base, &self.compat.completions_path)
    }

    /// Local servers such as Ollama run without a key; no auth header is
    /// sent when the key is empty.
    pub fn headers(&self, api_key: &str) -> Vec<Header> {
        let mut headers = Vec::with_capacity(2);
        if !api_key.is_empty() {
            headers.push(self.compat.auth_header(api_key));
        }
        headers.push(json_content_type());
        headers
    }
}

#[async_trait]
impl Provider for CompatClient {
    fn name(&self) -> &str {
        &self.compat.provider_name
    }

    async fn send_message(
        &self,
        config: &RequestConfig,
        messages_json: &str,
        tools_json: Option<&str>,
    ) -> ProviderResult<ProviderResponse> {
        let config = self.compat.effective_config(config);
        let mut buf = BodyWriter::with_limit(self.body_limit);
        openai::build_request_body(
            &mut buf,
            &config,
            messages_json,
            self.compat.effective_tools(tools_json),
        )?;

        let url = self.endpoint(&config);
        let headers = self.headers(config.api_key.expose_secret());
        debug!(
            provider = %self.compat.provider_name,
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
