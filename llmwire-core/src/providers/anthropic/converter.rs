//! Request-body and message builders for the Anthropic Messages API

use crate::protocol::json::BodyWriter;
use crate::protocol::{CodecResult, RequestConfig, ToolDefinition};

/// Schema sent for tools that declare no parameters
pub(crate) const EMPTY_OBJECT_SCHEMA: &str = r#"{"type":"object","properties":{}}"#;

/// Build a Messages API request body.
///
/// `max_tokens` is always sent. `tools_json` and `messages_json` are passed
/// through verbatim.
pub fn build_request_body(
    buf: &mut BodyWriter,
    config: &RequestConfig,
    messages_json: &str,
    tools_json: Option<&str>,
) -> CodecResult<()> {
    buf.raw("{\"model\":")?.string(&config.model)?;
    buf.format(format_args!(",\"max_tokens\":{}", config.max_tokens))?;
    if config.stream {
        buf.raw(",\"stream\":true")?;
    }
    if let Some(temperature) = config.temperature {
        buf.format(format_args!(",\"temperature\":{:.1}", temperature))?;
    }
    if let Some(system) = config.system_prompt.as_deref().filter(|s| !s.is_empty()) {
        buf.raw(",\"system\":[{\"type\":\"text\",\"text\":")?
            .string(system)?
            .raw("}]")?;
    }
    if let Some(tools) = tools_json {
        buf.raw(",\"tools\":")?.raw(tools)?;
    }
    buf.raw(",\"messages\":")?.raw(messages_json)?.raw("}")?;
    Ok(())
}

fn build_text_message(buf: &mut BodyWriter, role: &str, text: &str) -> CodecResult<()> {
    buf.raw("{\"role\":")?
        .string(role)?
        .raw(",\"content\":[{\"type\":\"text\",\"text\":")?
        .string(text)?
        .raw("}]}")?;
    Ok(())
}

/// `{"role":"user","content":[{"type":"text","text":...}]}`
pub fn build_user_message(buf: &mut BodyWriter, text: &str) -> CodecResult<()> {
    build_text_message(buf, "user", text)
}

/// `{"role":"assistant","content":[{"type":"text","text":...}]}`
pub fn build_assistant_message(buf: &mut BodyWriter, text: &str) -> CodecResult<()> {
    build_text_message(buf, "assistant", text)
}

/// Tool results travel as a user message holding a `tool_result` block
pub fn build_tool_result_message(
    buf: &mut BodyWriter,
    tool_use_id: &str,
    content: &str,
) -> CodecResult<()> {
    buf.raw("{\"role\":\"user\",\"content\":[{\"type\":\"tool_result\",\"tool_use_id\":")?
        .string(tool_use_id)?
        .raw(",\"content\":")?
        .string(content)?
        .raw("}]}")?;
    Ok(())
}

/// `{"name":...,"description":...,"input_schema":...}`
pub fn build_tool_json(buf: &mut BodyWriter, tool: &ToolDefinition) -> CodecResult<()> {
    buf.raw("{\"name\":")?
        .string(&tool.name)?
        .raw(",\"description\":")?
        .string(&tool.description)?
        .raw(",\"input_schema\":")?
        .raw(tool.parameters_json.as_deref().unwrap_or(EMPTY_OBJECT_SCHEMA))?
        .raw("}")?;
    Ok(())
}

/// A JSON array of [`build_tool_json`] objects
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CodecError;
    use serde_json::Value;

    fn body(config: &RequestConfig, messages: &str, tools: Option<&str>) -> Value {
        let mut buf = BodyWriter::new();
        build_request_body(&mut buf, config, messages, tools).unwrap();
        serde_json::from_str(buf.as_str()).unwrap()
    }

    #[test]
    fn test_minimal_body() {
        let config = RequestConfig::new("claude-sonnet-4-5", "k").with_stream(false);
        let mut buf = BodyWriter::new();
        build_request_body(&mut buf, &config, "[]", None).unwrap();
        assert_eq!(
            buf.as_str(),
            r#"{"model":"claude-sonnet-4-5","max_tokens":4096,"messages":[]}"#
        );
    }

    #[test]
    fn test_full_body_shape() {
        let config = RequestConfig::new("claude-sonnet-4-5", "k")
            .with_system_prompt("Be \"brief\"")
            .with_temperature(0.7)
            .with_max_tokens(1024);
        let tools = r#"[{"name":"t","description":"","input_schema":{}}]"#;
        let json = body(&config, r#"[{"role":"user","content":"hi"}]"#, Some(tools));

        assert_eq!(json["model"], "claude-sonnet-4-5");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["stream"], true);
        assert_eq!(json["temperature"].as_f64(), Some(0.7));
        assert_eq!(json["system"][0]["type"], "text");
        assert_eq!(json["system"][0]["text"], "Be \"brief\"");
        assert_eq!(json["tools"][0]["name"], "t");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_max_tokens_zero_still_sent() {
        let config = RequestConfig::new("m", "k").with_max_tokens(0);
        let json = body(&config, "[]", None);
        assert_eq!(json["max_tokens"], 0);
    }

    #[test]
    fn test_temperature_one_decimal() {
        let config = RequestConfig::new("m", "k").with_temperature(0.26).with_stream(false);
        let mut buf = BodyWriter::new();
        build_request_body(&mut buf, &config, "[]", None).unwrap();
        assert!(buf.as_str().contains("\"temperature\":0.3"));
    }

    #[test]
    fn test_user_and_assistant_messages() {
        let mut buf = BodyWriter::new();
        build_user_message(&mut buf, "line1\nline2").unwrap();
        assert_eq!(
            buf.as_str(),
            r#"{"role":"user","content":[{"type":"text","text":"line1\nline2"}]}"#
        );

        let mut buf = BodyWriter::new();
        build_assistant_message(&mut buf, "ok").unwrap();
        let json: Value = serde_json::from_str(buf.as_str()).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"][0]["text"], "ok");
    }

    #[test]
    fn test_tool_result_message() {
        let mut buf = BodyWriter::new();
        build_tool_result_message(&mut buf, "toolu_01", "72F").unwrap();
        let json: Value = serde_json::from_str(buf.as_str()).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "tool_result");
        assert_eq!(json["content"][0]["tool_use_id"], "toolu_01");
        assert_eq!(json["content"][0]["content"], "72F");
    }

    #[test]
    fn test_tool_json_wraps_input_schema() {
        let tool = ToolDefinition::new("get_weather")
            .with_description("Weather lookup")
            .with_parameters(r#"{"type":"object","properties":{"city":{"type":"string"}}}"#);
        let mut buf = BodyWriter::new();
        build_tools_json(&mut buf, &[tool, ToolDefinition::new("noop")]).unwrap();
        let json: Value = serde_json::from_str(buf.as_str()).unwrap();
        assert_eq!(json[0]["name"], "get_weather");
        assert_eq!(
            json[0]["input_schema"]["properties"]["city"]["type"],
            "string"
        );
        assert_eq!(json[1]["input_schema"]["type"], "object");
        assert_eq!(json[1]["description"], "");
    }

    #[test]
    fn test_no_space_error() {
        let config = RequestConfig::new("claude-sonnet-4-5", "k");
        let mut buf = BodyWriter::with_limit(16);
        let err = build_request_body(&mut buf, &config, "[]", None).unwrap_err();
        assert!(matches!(err, CodecError::NoSpace { limit: 16, .. }));
    }
}
