//! SSE frame parser behavior across chunk boundaries

use llmwire_core::protocol::sse::{parse_all, SseEvent, SseParser};
use proptest::prelude::*;

const SAMPLE: &str = concat!(
    ": keep-alive\r\n",
    "event: message_start\r\n",
    "data: {\"type\":\"message_start\"}\r\n",
    "\r\n",
    "event: content_block_delta\n",
    "data: {\"text\":\"multi\n",
    ": interleaved comment\n",
    "data: line\"}\n",
    "\n",
    "event: orphan\n",
    "\n",
    "data:no-space\n",
    "id: 42\n",
    "retry: 1000\n",
    "\n",
    "data: [DONE]\n",
    "\n",
);

fn feed_in_chunks(body: &[u8], sizes: &[usize]) -> Vec<SseEvent> {
    let mut parser = SseParser::new();
    let mut events = Vec::new();
    let mut offset = 0;
    let mut sizes = sizes.iter().cycle();
    while offset < body.len() {
        let size = (*sizes.next().unwrap()).max(1);
        let end = (offset + size).min(body.len());
        events.extend(parser.feed(&body[offset..end]));
        offset = end;
    }
    events
}

#[test]
fn test_sample_stream() {
    let events = parse_all(SAMPLE.as_bytes());
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].event_type.as_deref(), Some("message_start"));
    assert_eq!(events[1].data, "{\"text\":\"multi\nline\"}");
    assert_eq!(events[2].event_type, None);
    assert_eq!(events[2].data, "no-space");
    assert!(events[3].is_done());
}

#[test]
fn test_one_byte_at_a_time() {
    let whole = parse_all(SAMPLE.as_bytes());
    let bytewise = feed_in_chunks(SAMPLE.as_bytes(), &[1]);
    assert_eq!(whole, bytewise);
}

#[test]
fn test_event_spanning_feeds_is_held_back() {
    let mut parser = SseParser::new();
    assert!(parser.feed(b"event: ping\nda").is_empty());
    assert!(parser.feed(b"ta: {}\n").is_empty());
    let events = parser.feed(b"\n");
    assert_eq!(events, vec![SseEvent::new(Some("ping"), "{}")]);
    assert_eq!(parser.emitted(), 1);
    assert_eq!(parser.pending_bytes(), 0);
}

#[test]
fn test_multibyte_text_split_mid_character() {
    let body = "data: héllo 世界\n\n".as_bytes();
    let events = feed_in_chunks(body, &[8, 1, 3]);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "héllo 世界");
}

proptest! {
    #[test]
    fn prop_chunking_does_not_change_events(sizes in prop::collection::vec(1usize..17, 1..12)) {
        let whole = parse_all(SAMPLE.as_bytes());
        let chunked = feed_in_chunks(SAMPLE.as_bytes(), &sizes);
        prop_assert_eq!(whole, chunked);
    }

    #[test]
    fn prop_data_lines_join_in_order(lines in prop::collection::vec("[a-zA-Z0-9 {}\":,]{0,20}", 1..6)) {
        let mut body = String::new();
        for line in &lines {
            body.push_str("data: ");
            body.push_str(line);
            body.push('\n');
            body.push_str(": noise\n");
        }
        body.push('\n');
        let events = parse_all(body.as_bytes());
        prop_assert_eq!(events.len(), 1);
        prop_assert_eq!(&events[0].data, &lines.join("\n"));
    }
}
