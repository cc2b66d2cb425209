//! Protocol module: the canonical model and wire-level helpers
//!
//! - [`types`]: vendor-neutral request and stream-event vocabulary
//! - [`sse`]: incremental Server-Sent Events frame parser
//! - [`json`]: escaping, bounded body writer, and field scanners

pub mod error;
pub mod json;
pub mod sse;
pub mod types;

pub use error::{CodecError, CodecResult};
pub use json::BodyWriter;
pub use sse::{SseEvent, SseParser};
pub use types::{
    ApiType, ContentType, RequestConfig, Role, StopReason, StreamEvent, StreamEventType,
    ToolDefinition, Usage, DEFAULT_MAX_TOKENS,
};
