//! Anthropic SSE event translation
//!
//! Dispatches on the SSE `event:` name. `content_block_stop` maps to no
//! event: the frame only carries a block index, and no per-index state is
//! kept to tell a closing text block from a closing tool-use block.

use crate::protocol::json::{extract_number, extract_string, has_string_value, value_slice};
use crate::protocol::{SseEvent, StopReason, StreamEvent, Usage};
use tracing::debug;

/// Translate one Anthropic SSE frame into a canonical event
pub fn parse_stream_event(event: &SseEvent) -> Option<StreamEvent> {
    if event.is_done() {
        return Some(StreamEvent::stop(Some(StopReason::EndTurn)));
    }

    let data = event.data.as_str();
    match event.event_type.as_deref()? {
        "message_start" => Some(StreamEvent::start().with_usage(start_usage(data))),
        "content_block_start" => Some(content_block_start(data)),
        "content_block_delta" => content_block_delta(data),
        "content_block_stop" => None,
        "message_delta" => {
            let reason = extract_string(data, "stop_reason")
                .as_deref()
                .and_then(StopReason::from_anthropic);
            let usage = extract_number(data, "output_tokens").map(|output_tokens| Usage {
                output_tokens,
                ..Default::default()
            });
            Some(StreamEvent::stop(reason).with_usage(usage))
        }
        "message_stop" => Some(StreamEvent::stop(Some(StopReason::EndTurn))),
        "error" => {
            let message = value_slice(data, "error").and_then(|e| extract_string(e, "message"));
            Some(StreamEvent::error(message))
        }
        other => {
            debug!(event = other, "ignoring anthropic stream event");
            None
        }
    }
}

fn start_usage(data: &str) -> Option<Usage> {
    let input_tokens = extract_number(data, "input_tokens")?;
    Some(Usage {
        input_tokens,
        output_tokens: 0,
        cache_read_tokens: extract_number(data, "cache_read_input_tokens").unwrap_or(0),
        cache_write_tokens: extract_number(data, "cache_creation_input_tokens").unwrap_or(0),
    })
}

fn content_block_start(data: &str) -> StreamEvent {
    if !has_string_value(data, "type", "tool_use") {
        return StreamEvent::start();
    }
    let block = value_slice(data, "content_block").unwrap_or(data);
    StreamEvent::tool_call_start(extract_string(block, "id"), extract_string(block, "name"))
}

fn content_block_delta(data: &str) -> Option<StreamEvent> {
    if let Some(text) = extract_string(data, "text") {
        return Some(StreamEvent::text_delta(text));
    }
    extract_string(data, "partial_json").map(StreamEvent::tool_call_delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::StreamEventType;

    fn frame(event: &str, data: &str) -> SseEvent {
        SseEvent::new(Some(event), data)
    }

    #[test]
    fn test_message_start_with_usage() {
        let event = parse_stream_event(&frame(
            "message_start",
            r#"{"type":"message_start","message":{"id":"msg_1","usage":{"input_tokens":25,"cache_creation_input_tokens":4,"cache_read_input_tokens":9,"output_tokens":1}}}"#,
        ))
        .unwrap();
        assert_eq!(event.event_type, StreamEventType::Start);
        let usage = event.usage.unwrap();
        assert_eq!(usage.input_tokens, 25);
        assert_eq!(usage.output_tokens, 0);
        assert_eq!(usage.cache_read_tokens, 9);
        assert_eq!(usage.cache_write_tokens, 4);
    }

    #[test]
    fn test_text_block_start_is_bare_start() {
        let event = parse_stream_event(&frame(
            "content_block_start",
            r#"{"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
        ))
        .unwrap();
        assert_eq!(event, StreamEvent::start());
    }

    #[test]
    fn test_tool_use_block_start() {
        let event = parse_stream_event(&frame(
            "content_block_start",
            r#"{"type":"content_block_start","index":1,"content_block":{"type":"tool_use","id":"toolu_01A","name":"get_weather","input":{}}}"#,
        ))
        .unwrap();
        assert_eq!(event.event_type, StreamEventType::ToolCallStart);
        assert_eq!(event.tool_call_id.as_deref(), Some("toolu_01A"));
        assert_eq!(event.tool_name.as_deref(), Some("get_weather"));
    }

    #[test]
    fn test_text_delta() {
        let event = parse_stream_event(&frame(
            "content_block_delta",
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hello\nthere"}}"#,
        ))
        .unwrap();
        assert_eq!(event, StreamEvent::text_delta("Hello\nthere"));
    }

    #[test]
    fn test_input_json_delta() {
        let event = parse_stream_event(&frame(
            "content_block_delta",
            r#"{"type":"content_block_delta","index":1,"delta":{"type":"input_json_delta","partial_json":"{\"city\": \"Par"}}"#,
        ))
        .unwrap();
        assert_eq!(event, StreamEvent::tool_call_delta("{\"city\": \"Par"));
    }

    #[test]
    fn test_unknown_delta_is_none() {
        let event = parse_stream_event(&frame(
            "content_block_delta",
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"thinking_delta","thinking":"hmm"}}"#,
        ));
        assert!(event.is_none());
    }

    #[test]
    fn test_content_block_stop_is_none() {
        let event = parse_stream_event(&frame(
            "content_block_stop",
            r#"{"type":"content_block_stop","index":1}"#,
        ));
        assert!(event.is_none());
    }

    #[test]
    fn test_message_delta_stop_reason_and_usage() {
        let event = parse_stream_event(&frame(
            "message_delta",
            r#"{"type":"message_delta","delta":{"stop_reason":"max_tokens","stop_sequence":null},"usage":{"output_tokens":15}}"#,
        ))
        .unwrap();
        assert_eq!(event.event_type, StreamEventType::Stop);
        assert_eq!(event.stop_reason, Some(StopReason::MaxTokens));
        assert_eq!(event.usage.unwrap().output_tokens, 15);
    }

    #[test]
    fn test_message_delta_without_reason() {
        let event = parse_stream_event(&frame(
            "message_delta",
            r#"{"type":"message_delta","delta":{"stop_reason":null}}"#,
        ))
        .unwrap();
        assert_eq!(event, StreamEvent::stop(None));
    }

    #[test]
    fn test_message_stop() {
        let event = parse_stream_event(&frame("message_stop", r#"{"type":"message_stop"}"#));
        assert_eq!(event, Some(StreamEvent::stop(Some(StopReason::EndTurn))));
    }

    #[test]
    fn test_error_event() {
        let event = parse_stream_event(&frame(
            "error",
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        ))
        .unwrap();
        assert_eq!(event, StreamEvent::error(Some("Overloaded".to_string())));

        let event = parse_stream_event(&frame("error", r#"{"type":"error","error":{}}"#)).unwrap();
        assert_eq!(event, StreamEvent::error(None));
    }

    #[test]
    fn test_done_without_event_name() {
        let event = parse_stream_event(&SseEvent::new(None, "[DONE]"));
        assert_eq!(event, Some(StreamEvent::stop(Some(StopReason::EndTurn))));
    }

    #[test]
    fn test_ping_and_unnamed_frames_ignored() {
        assert!(parse_stream_event(&frame("ping", r#"{"type":"ping"}"#)).is_none());
        assert!(parse_stream_event(&SseEvent::new(None, r#"{"type":"ping"}"#)).is_none());
    }
}
