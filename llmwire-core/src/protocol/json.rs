//! Hand-rolled JSON writing and scanning helpers
//!
//! Vendor request bodies are assembled by hand so the emitted bytes are
//! exactly what each vendor expects, and streamed frames are read with
//! small prefix/quote scanners tailored to the known response shapes.
//! Nothing here is a general JSON parser.

use super::error::{CodecError, CodecResult};
use std::fmt::Write as _;

/// Default capacity for a request body (64 KiB)
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Append `value` to `out` with JSON string escaping applied.
///
/// `"` and `\` are backslash-escaped, `\n` `\r` `\t` use their short forms,
/// every other control character below 0x20 becomes `\u00xx` (lowercase hex).
/// Everything else, including multi-byte UTF-8, passes through unchanged.
pub fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
}

/// Escape `value` into a fresh string
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    escape_into(&mut out, value);
    out
}

/// A growable output buffer with a hard capacity.
///
/// Every write checks the limit up front and fails with
/// [`CodecError::NoSpace`] instead of truncating.
#[derive(Debug, Clone)]
pub struct BodyWriter {
    buf: String,
    limit: usize,
}

impl Default for BodyWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyWriter {
    /// Create a writer with the default 64 KiB limit
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_BODY_LIMIT)
    }

    /// Create a writer that refuses to grow past `limit` bytes
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: String::new(),
            limit,
        }
    }

    /// Maximum number of bytes this writer accepts
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the bytes written so far
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Discard the contents, keeping the limit
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Take ownership of the written body
    pub fn into_string(self) -> String {
        self.buf
    }

    fn reserve(&self, extra: usize) -> CodecResult<()> {
        let needed = self.buf.len() + extra;
        if needed > self.limit {
            return Err(CodecError::NoSpace {
                limit: self.limit,
                needed,
            });
        }
        Ok(())
    }

    /// Append raw, already-valid JSON text
    pub fn raw(&mut self, text: &str) -> CodecResult<&mut Self> {
        self.reserve(text.len())?;
        self.buf.push_str(text);
        Ok(self)
    }

    /// Append `value` as a quoted, escaped JSON string
    pub fn string(&mut self, value: &str) -> CodecResult<&mut Self> {
        let mut escaped = String::with_capacity(value.len() + 2);
        escaped.push('"');
        escape_into(&mut escaped, value);
        escaped.push('"');
        self.raw(&escaped)
    }

    /// Append formatted text, e.g. numbers
    pub fn format(&mut self, args: std::fmt::Arguments<'_>) -> CodecResult<&mut Self> {
        let text = args.to_string();
        self.raw(&text)
    }
}

/// Write `items` (each already valid JSON) as a JSON array
pub fn write_array<'a, I>(buf: &mut BodyWriter, items: I) -> CodecResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    buf.raw("[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            buf.raw(",")?;
        }
        buf.raw(item)?;
    }
    buf.raw("]")?;
    Ok(())
}

/// Locate the byte offset just past `"key"` followed by optional whitespace
/// and a colon, starting the search at `from`.
fn find_value_start(json: &str, key: &str, from: usize) -> Option<(usize, usize)> {
    let needle = format!("\"{key}\"");
    let bytes = json.as_bytes();
    let mut search = from;
    while let Some(rel) = json.get(search..)?.find(&needle) {
        let key_end = search + rel + needle.len();
        let mut pos = key_end;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos < bytes.len() && bytes[pos] == b':' {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            return Some((pos, key_end));
        }
        search = key_end;
    }
    None
}

/// Scan a quoted string starting at `start` (which must point at the opening
/// quote). Returns the decoded value and the offset past the closing quote.
fn scan_string(json: &str, start: usize) -> Option<(String, usize)> {
    let bytes = json.as_bytes();
    if bytes.get(start) != Some(&b'"') {
        return None;
    }
    let mut out = String::new();
    let mut pos = start + 1;
    let mut run_start = pos;
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => {
                out.push_str(&json[run_start..pos]);
                return Some((out, pos + 1));
            }
            b'\\' => {
                out.push_str(&json[run_start..pos]);
                let escape = *bytes.get(pos + 1)?;
                pos += 2;
                match escape {
                    b'"' => out.push('"'),
                    b'\\' => out.push('\\'),
                    b'/' => out.push('/'),
                    b'n' => out.push('\n'),
                    b'r' => out.push('\r'),
                    b't' => out.push('\t'),
                    b'b' => out.push('\u{08}'),
                    b'f' => out.push('\u{0c}'),
                    b'u' => {
                        let (ch, next) = decode_unicode_escape(json, pos)?;
                        out.push(ch);
                        pos = next;
                    }
                    _ => return None,
                }
                run_start = pos;
            }
            _ => pos += 1,
        }
    }
    // Unterminated string: the value runs off the end of the buffer
    None
}

fn hex4(json: &str, at: usize) -> Option<u32> {
    let digits = json.get(at..at + 4)?;
    u32::from_str_radix(digits, 16).ok()
}

/// Decode the four hex digits at `at` (and a trailing low surrogate if the
/// first unit is a high surrogate).
fn decode_unicode_escape(json: &str, at: usize) -> Option<(char, usize)> {
    let unit = hex4(json, at)?;
    let mut next = at + 4;
    if (0xD800..0xDC00).contains(&unit) {
        if json.get(next..next + 2) == Some("\\u") {
            let low = hex4(json, next + 2)?;
            if (0xDC00..0xE000).contains(&low) {
                next += 6;
                let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                return Some((char::from_u32(combined)?, next));
            }
        }
        return Some((char::REPLACEMENT_CHARACTER, next));
    }
    Some((char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER), next))
}

/// Extract the first string value stored under `key`.
///
/// Occurrences of `key` whose value is not a string (`null`, numbers,
/// objects) are skipped. Escapes inside the value are decoded, so an escaped
/// quote or an escaped trailing backslash is handled. A value that is cut off
/// by the end of the buffer yields `None`.
pub fn extract_string(json: &str, key: &str) -> Option<String> {
    let mut from = 0;
    while let Some((value_start, key_end)) = find_value_start(json, key, from) {
        if json.as_bytes().get(value_start) == Some(&b'"') {
            return scan_string(json, value_start).map(|(value, _)| value);
        }
        from = key_end;
    }
    None
}

/// Extract the first unsigned integer stored under `key`
pub fn extract_number(json: &str, key: &str) -> Option<u64> {
    let mut from = 0;
    while let Some((value_start, key_end)) = find_value_start(json, key, from) {
        let digits: &str = {
            let rest = &json[value_start..];
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            &rest[..end]
        };
        if !digits.is_empty() {
            return digits.parse().ok();
        }
        from = key_end;
    }
    None
}

/// True if any occurrence of `key` holds exactly the string `expected`
pub fn has_string_value(json: &str, key: &str, expected: &str) -> bool {
    let mut from = 0;
    while let Some((value_start, key_end)) = find_value_start(json, key, from) {
        if let Some((value, _)) = scan_string(json, value_start) {
            if value == expected {
                return true;
            }
        }
        from = key_end;
    }
    false
}

/// True if `key` appears as an object key anywhere in `json`
pub fn contains_key(json: &str, key: &str) -> bool {
    find_value_start(json, key, 0).is_some()
}

/// The slice of `json` that starts at the value of `key`, if present.
///
/// Used to scope later lookups to a nested object, e.g. reading `id` from a
/// `tool_calls` entry rather than the chunk's own top-level `id`.
pub fn value_slice<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    find_value_start(json, key, 0).map(|(start, _)| &json[start..])
}
