//! Request-body and message builders for Gemini `generateContent`

use crate::protocol::json::BodyWriter;
use crate::protocol::{CodecResult, RequestConfig, ToolDefinition};

/// Build a `generateContent` request body.
///
/// `tools_json` must be an array of function declarations (see
/// [`build_tools_json`]); it is wrapped in a single `functionDeclarations`
/// tool entry.
pub fn build_request_body(
    buf: &mut BodyWriter,
    config: &RequestConfig,
    messages_json: &str,
    tools_json: Option<&str>,
) -> CodecResult<()> {
    buf.raw("{\"contents\":")?.raw(messages_json)?;

    buf.raw(",\"generationConfig\":{")?;
    let mut first = true;
    if config.max_tokens > 0 {
        buf.format(format_args!("\"maxOutputTokens\":{}", config.max_tokens))?;
        first = false;
    }
    if let Some(temperature) = config.temperature {
        if !first {
            buf.raw(",")?;
        }
        buf.format(format_args!("\"temperature\":{:.1}", temperature))?;
    }
    buf.raw("}")?;

    if let Some(system) = config.system_prompt.as_deref().filter(|s| !s.is_empty()) {
        buf.raw(",\"systemInstruction\":{\"parts\":[{\"text\":")?
            .string(system)?
            .raw("}]}")?;
    }
    if let Some(tools) = tools_json {
        buf.raw(",\"tools\":[{\"functionDeclarations\":")?
            .raw(tools)?
            .raw("}]")?;
    }
    buf.raw("}")?;
    Ok(())
}

fn build_text_message(buf: &mut BodyWriter, role: &str, text: &str) -> CodecResult<()> {
    buf.raw("{\"role\":")?
        .string(role)?
        .raw(",\"parts\":[{\"text\":")?
        .string(text)?
        .raw("}]}")?;
    Ok(())
}

/// `{"role":"user","parts":[{"text":...}]}`
pub fn build_user_message(buf: &mut BodyWriter, text: &str) -> CodecResult<()> {
    build_text_message(buf, "user", text)
}

/// Assistant turns use the role `model`
pub fn build_assistant_message(buf: &mut BodyWriter, text: &str) -> CodecResult<()> {
    build_text_message(buf, "model", text)
}

/// A `functionResponse` part. Gemini correlates results by function name,
/// not by call id.
pub fn build_tool_result_message(
    buf: &mut BodyWriter,
    function_name: &str,
    content: &str,
) -> CodecResult<()> {
    buf.raw("{\"role\":\"user\",\"parts\":[{\"functionResponse\":{\"name\":")?
        .string(function_name)?
        .raw(",\"response\":{\"content\":")?
        .string(content)?
        .raw("}}}]}")?;
    Ok(())
}

/// `{"name":...,"description":...,"parameters":...}`; `parameters` is left
/// out when the tool declares none.
pub fn build_tool_json(buf: &mut BodyWriter, tool: &ToolDefinition) -> CodecResult<()> {
    buf.raw("{\"name\":")?
        .string(&tool.name)?
        .raw(",\"description\":")?
        .string(&tool.description)?;
    if let Some(parameters) = tool.parameters_json.as_deref() {
        buf.raw(",\"parameters\":")?.raw(parameters)?;
    }
    buf.raw("}")?;
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
