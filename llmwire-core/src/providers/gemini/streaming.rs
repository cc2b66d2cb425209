//! Gemini stream chunk translation

use crate::protocol::json::{contains_key, extract_number, extract_string, value_slice};
use crate::protocol::{SseEvent, StopReason, StreamEvent, Usage};

/// Translate one Gemini SSE frame into a canonical event.
///
/// A frame carrying both text and a `finishReason` yields the text; Gemini
/// frames are classified by content and the event name is ignored.
pub fn parse_stream_event(event: &SseEvent) -> Option<StreamEvent> {
    let data = event.data.as_str();
    if data.is_empty() {
        return None;
    }

    if contains_key(data, "candidates") {
        if let Some(text) = extract_string(data, "text") {
            return Some(StreamEvent::text_delta(text).with_usage(usage(data)));
        }
    }

    if let Some(reason) = extract_string(data, "finishReason") {
        return Some(StreamEvent::stop(StopReason::from_gemini(&reason)).with_usage(usage(data)));
    }

    if let Some(error) = value_slice(data, "error").filter(|v| v.starts_with('{')) {
        return Some(StreamEvent::error(extract_string(error, "message")));
    }

    None
}

fn usage(data: &str) -> Option<Usage> {
    let metadata = value_slice(data, "usageMetadata")?;
    let input_tokens = extract_number(metadata, "promptTokenCount");
    let output_tokens = extract_number(metadata, "candidatesTokenCount");
    if input_tokens.is_none() && output_tokens.is_none() {
        return None;
    }
    Some(Usage {
        input_tokens: input_tokens.unwrap_or(0),
        output_tokens: output_tokens.unwrap_or(0),
        cache_read_tokens: extract_number(metadata, "cachedContentTokenCount").unwrap_or(0),
        cache_write_tokens: 0,
    })
}
