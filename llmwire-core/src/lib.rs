//! llmwire core library
//!
//! One interface for sending a conversation turn to Anthropic, OpenAI,
//! Google Gemini, or any OpenAI-compatible vendor, and for reading the
//! streamed answer back as vendor-neutral events.
//!
//! - [`protocol`]: the canonical model, SSE frame parser and JSON helpers
//! - [`providers`]: per-vendor codecs and clients, retry handling
//! - [`http`]: the transport seam and its reqwest implementation
//! - [`config`]: optional YAML/JSON configuration loading
//!
//! ```no_run
//! use llmwire_core::http::HttpClient;
//! use llmwire_core::protocol::{ApiType, RequestConfig};
//! use llmwire_core::providers::{decode_stream, Provider, ReliableProvider, RetryConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpClient::new()?);
//! let client = ApiType::Anthropic.create_client(transport, None)?;
//! let provider = ReliableProvider::new(client, RetryConfig::default());
//!
//! let config = RequestConfig::new("claude-sonnet-4-5", "sk-ant-...");
//! let messages = r#"[{"role":"user","content":[{"type":"text","text":"Hello"}]}]"#;
//! let response = provider.send_message(&config, messages, None).await?;
//! for event in decode_stream(ApiType::Anthropic, &response.body) {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod protocol;
pub mod providers;

/// Returns the version of the llmwire core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
