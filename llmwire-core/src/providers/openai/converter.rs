//! Request-body and message builders for OpenAI Chat Completions

use crate::protocol::json::BodyWriter;
use crate::protocol::{CodecError, CodecResult, RequestConfig, ToolDefinition};

const EMPTY_OBJECT_SCHEMA: &str = r#"{"type":"object","properties":{}}"#;

/// Build a Chat Completions request body.
///
/// `max_tokens` is omitted when zero. A system prompt is not a top-level
/// field here: it is spliced in as the first element of `messages_json`,
/// which must therefore be a JSON array.
pub fn build_request_body(
    buf: &mut BodyWriter,
    config: &RequestConfig,
    messages_json: &str,
    tools_json: Option<&str>,
) -> CodecResult<()> {
    buf.raw("{\"model\":")?.string(&config.model)?;
    if config.max_tokens > 0 {
        buf.format(format_args!(",\"max_tokens\":{}", config.max_tokens))?;
    }
    if config.stream {
        buf.raw(",\"stream\":true")?;
    }
    if let Some(temperature) = config.temperature {
        buf.format(format_args!(",\"temperature\":{:.1}", temperature))?;
    }
    if let Some(tools) = tools_json {
        buf.raw(",\"tools\":")?
            .raw(tools)?
            .raw(",\"tool_choice\":\"auto\"")?;
    }
    buf.raw(",\"messages\":")?;
    match config.system_prompt.as_deref().filter(|s| !s.is_empty()) {
        Some(system) => write_with_system(buf, system, messages_json)?,
        None => {
            buf.raw(messages_json)?;
        }
    }
    buf.raw("}")?;
    Ok(())
}

fn write_with_system(buf: &mut BodyWriter, system: &str, messages_json: &str) -> CodecResult<()> {
    let rest = messages_json
        .trim_start()
        .strip_prefix('[')
        .ok_or_else(|| CodecError::InvalidMessages("messages must be a JSON array".to_string()))?;

    buf.raw("[{\"role\":\"system\",\"content\":")?
        .string(system)?
        .raw("}")?;
    if !rest.trim_start().starts_with(']') {
        buf.raw(",")?;
    }
    buf.raw(rest)?;
    Ok(())
}

fn build_text_message(buf: &mut BodyWriter, role: &str, text: &str) -> CodecResult<()> {
    buf.raw("{\"role\":")?
        .string(role)?
        .raw(",\"content\":")?
        .string(text)?
        .raw("}")?;
    Ok(())
}

/// `{"role":"user","content":"..."}`
pub fn build_user_message(buf: &mut BodyWriter, text: &str) -> CodecResult<()> {
    build_text_message(buf, "user", text)
}

/// `{"role":"assistant","content":"..."}`
pub fn build_assistant_message(buf: &mut BodyWriter, text: &str) -> CodecResult<()> {
    build_text_message(buf, "assistant", text)
}

/// `{"role":"tool","tool_call_id":...,"content":...}`
pub fn build_tool_result_message(
    buf: &mut BodyWriter,
    tool_call_id: &str,
    content: &str,
) -> CodecResult<()> {
    buf.raw("{\"role\":\"tool\",\"tool_call_id\":")?
        .string(tool_call_id)?
        .raw(",\"content\":")?
        .string(content)?
        .raw("}")?;
    Ok(())
}

/// `{"type":"function","function":{"name":...,"description":...,"parameters":...}}`
pub fn build_tool_json(buf: &mut BodyWriter, tool: &ToolDefinition) -> CodecResult<()> {
    buf.raw("{\"type\":\"function\",\"function\":{\"name\":")?
        .string(&tool.name)?
        .raw(",\"description\":")?
        .string(&tool.description)?
        .raw(",\"parameters\":")?
        .raw(tool.parameters_json.as_deref().unwrap_or(EMPTY_OBJECT_SCHEMA))?
        .raw("}}")?;
    Ok(())
}

pub fn build_tools_json(buf: &mut BodyWriter, tools: &[ToolDefinition]) -> CodecResult<()> {
    buf.raw("[")?;
    for (i, tool) in tools.iter().enumerate() {
        if i > 0 {
            buf.raw(",")?;
        }
        build_tool_json(buf, tool)?;
    }
    buf.raw("]")?;
    Ok(())
}
