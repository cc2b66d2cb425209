//! OpenAI Chat Completions codec and client
//!
//! The same codec backs every OpenAI-compatible vendor through
//! [`crate::providers::compat`].

mod client;
pub mod converter;
pub mod streaming;

pub use client::{OpenAIClient, COMPLETIONS_PATH, DEFAULT_BASE_URL};
pub use converter::{
    build_assistant_message, build_request_body, build_tool_json, build_tool_result_message,
    build_tools_json, build_user_message,
};
pub use streaming::parse_stream_event;
