//! Google Gemini `v1beta` codec and client
//!
//! Unlike the other vendors, the model, streaming mode, and API key travel in
//! the URL rather than the body or headers.

mod client;
pub mod converter;
pub mod streaming;

pub use client::{build_request_url, GeminiClient, API_VERSION, DEFAULT_BASE_URL};
pub use converter::{
    build_assistant_message, build_request_body, build_tool_json, build_tool_result_message,
    build_tools_json, build_user_message,
};
pub use streaming::parse_stream_event;
