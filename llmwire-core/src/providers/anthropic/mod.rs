//! Anthropic Messages API codec and client
//!
//! Speaks the `2023-06-01` Messages dialect: content-block messages, a
//! top-level `system` block array, and named SSE events
//! (`message_start`, `content_block_delta`, ...).

mod client;
pub mod converter;
pub mod streaming;

pub use client::{AnthropicClient, API_VERSION, DEFAULT_BASE_URL, MESSAGES_PATH};
pub use converter::{
    build_assistant_message, build_request_body, build_tool_json, build_tool_result_message,
    build_tools_json, build_user_message,
};
pub use streaming::parse_stream_event;
