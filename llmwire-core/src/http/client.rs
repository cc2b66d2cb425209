//! HTTP client implementation using reqwest

use crate::http::error::{map_transport_error, redact_query};
use crate::http::{Header, HttpTransport};
use crate::providers::adapter::ProviderResponse;
use crate::providers::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Default user agent
const USER_AGENT: &str = concat!("llmwire/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with connection pooling
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> ProviderResult<Self> {
        Self::with_config(Duration::from_secs(10), Duration::from_secs(300), 10)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(
        connect_timeout: Duration,
        request_timeout: Duration,
        max_idle_per_host: usize,
    ) -> ProviderResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    fn request(&self, url: &str, headers: &[Header], body: String) -> RequestBuilder {
        let mut builder = self.client.post(url);
        for header in headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        builder.body(body)
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        url: &str,
        streaming: bool,
    ) -> ProviderResult<ProviderResponse> {
        let request_id = Uuid::new_v4();
        let log_url = redact_query(url);
        debug!(%request_id, url = log_url, streaming, "sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| map_transport_error(e, log_url, request_id))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(e, log_url, request_id))?;

        info!(
            %request_id,
            url = log_url,
            status,
            bytes = body.len(),
            "request completed"
        );
        Ok(ProviderResponse::new(status, body))
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn post(
        &self,
        url: &str,
        headers: &[Header],
        body: String,
    ) -> ProviderResult<ProviderResponse> {
        let builder = self.request(url, headers, body);
        self.execute(builder, url, false).await
    }

    async fn post_sse(
        &self,
        url: &str,
        headers: &[Header],
        body: String,
    ) -> ProviderResult<ProviderResponse> {
        let builder = self
            .request(url, headers, body)
            .header("accept", "text/event-stream");
        self.execute(builder, url, true).await
    }
}
