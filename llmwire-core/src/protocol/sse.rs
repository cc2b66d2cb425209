//! # SSE Frame Parser
//!
//! Incremental Server-Sent Events parser. Bytes arrive in arbitrary chunk
//! sizes; complete lines are split out of an internal buffer and folded into
//! `(event, data)` frames. A blank line terminates a frame.
//!
//! ```text
//! event: content_block_delta
//! data: {"type":"content_block_delta", ...}
//!
//! data: [DONE]
//! ```
//!
//! Recognized fields are `event` (last one in a frame wins) and `data`
//! (multiple lines are joined with `\n`). Lines starting with `:` are
//! comments. Other fields and lines without a colon are ignored.

use bytes::BytesMut;
use serde::{Deserialize, Serialize};

/// The sentinel payload that marks the end of an OpenAI-style stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// One complete SSE frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SseEvent {
    /// Value of the last `event:` line in the frame, if any
    pub event_type: Option<String>,

    /// All `data:` lines of the frame joined with `\n`
    pub data: String,
}

impl SseEvent {
    pub fn new(event_type: Option<&str>, data: impl Into<String>) -> Self {
        Self {
            event_type: event_type.map(str::to_string),
            data: data.into(),
        }
    }

    /// True iff `data` is exactly `[DONE]`
    pub fn is_done(&self) -> bool {
        self.data == DONE_SENTINEL
    }
}

/// Incremental SSE parser.
///
/// Not reentrant: a single parser must be fed from one place at a time.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: BytesMut,
    /// Prefix of `buffer` already known to hold no `\n`
    scanned: usize,
    event_type: Option<String>,
    data_lines: Vec<String>,
    emitted: u64,
}

impl SseParser {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
            ..Default::default()
        }
    }

    /// Append `bytes` and return every frame completed by them, in order.
    ///
    /// An incomplete trailing line stays buffered for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(offset) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
            let newline_pos = self.scanned + offset;
            self.scanned = 0;
            let mut line_bytes = self.buffer.split_to(newline_pos + 1);
            line_bytes.truncate(line_bytes.len() - 1);
            if line_bytes.last() == Some(&b'\r') {
                line_bytes.truncate(line_bytes.len() - 1);
            }

            let line = String::from_utf8_lossy(&line_bytes);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        self.scanned = self.buffer.len();
        events
    }

    /// Number of frames emitted over the parser's lifetime
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Bytes still waiting for a line terminator
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = line.split_once(':')?;
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "data" => self.data_lines.push(value.to_string()),
            "event" => self.event_type = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = self.event_type.take();
        if self.data_lines.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data_lines).join("\n");
        self.emitted += 1;
        Some(SseEvent { event_type, data })
    }
}

/// Parse a complete SSE body in one go
pub fn parse_all(body: &[u8]) -> Vec<SseEvent> {
    SseParser::new().feed(body)
}
