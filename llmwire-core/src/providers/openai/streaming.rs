//! OpenAI stream chunk translation
//!
//! The SSE `event:` name is never consulted; chunks are classified purely by
//! the fields present in their JSON.

use crate::protocol::json::{extract_number, extract_string, value_slice};
use crate::protocol::{SseEvent, StopReason, StreamEvent, Usage};

/// Translate one OpenAI SSE frame into a canonical event
pub fn parse_stream_event(event: &SseEvent) -> Option<StreamEvent> {
    if event.is_done() {
        return Some(StreamEvent::stop(Some(StopReason::EndTurn)));
    }
    let data = event.data.as_str();
    if data.is_empty() {
        return None;
    }

    if let Some(reason) = extract_string(data, "finish_reason") {
        return Some(StreamEvent::stop(StopReason::from_openai(&reason)).with_usage(usage(data)));
    }

    if let Some(text) = extract_string(data, "content").filter(|t| !t.is_empty()) {
        return Some(StreamEvent::text_delta(text));
    }

    if let Some(calls) = value_slice(data, "tool_calls").filter(|v| v.starts_with('[')) {
        let id = extract_string(calls, "id");
        let name = extract_string(calls, "name");
        if id.is_some() || name.is_some() {
            return Some(StreamEvent::tool_call_start(id, name));
        }
        return extract_string(calls, "arguments").map(StreamEvent::tool_call_delta);
    }

    if let Some(usage) = usage(data) {
        return Some(StreamEvent::usage(usage));
    }

    if extract_string(data, "role").is_some() {
        return Some(StreamEvent::start());
    }

    None
}

/// Token counts from a chunk's `usage` object, if it carries one
fn usage(data: &str) -> Option<Usage> {
    let usage = value_slice(data, "usage").filter(|v| v.starts_with('{'))?;
    let input_tokens = extract_number(usage, "prompt_tokens");
    let output_tokens = extract_number(usage, "completion_tokens");
    if input_tokens.is_none() && output_tokens.is_none() {
        return None;
    }
    Some(Usage {
        input_tokens: input_tokens.unwrap_or(0),
        output_tokens: output_tokens.unwrap_or(0),
        cache_read_tokens: extract_number(usage, "cached_tokens").unwrap_or(0),
        cache_write_tokens: 0,
    })
}
