//! Canonical, vendor-neutral data model
//!
//! Every vendor codec translates its own wire dialect to and from these
//! types. They are request-scoped values: built fresh for each call and
//! dropped once the response has been consumed.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default output token budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Per-call request settings shared by every vendor codec
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    /// Model identifier, e.g. `claude-sonnet-4-5` or `gpt-4o`
    pub model: String,

    /// Optional system prompt
    pub system_prompt: Option<String>,

    /// Output token budget. Zero means "omit from the body" where the
    /// vendor allows it (OpenAI, Gemini); Anthropic always sends it.
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Request a streamed (SSE) response
    pub stream: bool,

    /// Vendor API key
    pub api_key: SecretString,

    /// Override for the vendor's default base URL
    pub base_url: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            system_prompt: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            stream: true,
            api_key: SecretString::new(""),
            base_url: None,
        }
    }
}

impl RequestConfig {
    /// Create a config for `model` authenticated with `api_key`
    pub fn new(model: impl Into<String>, api_key: impl Into<SecretString>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// A tool the model may call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (non-empty)
    pub name: String,

    /// Human readable description
    #[serde(default)]
    pub description: String,

    /// Raw JSON Schema text, passed through to the vendor untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters_json: Option<String>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters_json: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameters(mut self, schema_json: impl Into<String>) -> Self {
        self.parameters_json = Some(schema_json.into());
        self
    }
}

/// Token accounting for a response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_write_tokens: u64,
}

impl Usage {
    /// Input plus output tokens. Cache counters are informational only.
    ///
    /// Counts come from the vendor and saturate instead of overflowing.
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    /// Field-wise accumulation of `other` into `self`, saturating
    pub fn add(&mut self, other: &Usage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.cache_read_tokens = self.cache_read_tokens.saturating_add(other.cache_read_tokens);
        self.cache_write_tokens = self
            .cache_write_tokens
            .saturating_add(other.cache_write_tokens);
    }

    pub fn is_empty(&self) -> bool {
        *self == Usage::default()
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
    ContentFilter,
    Error,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::EndTurn => "end_turn",
            StopReason::ToolUse => "tool_use",
            StopReason::MaxTokens => "max_tokens",
            StopReason::StopSequence => "stop_sequence",
            StopReason::ContentFilter => "content_filter",
            StopReason::Error => "error",
        }
    }

    /// Map an Anthropic `stop_reason`
    pub fn from_anthropic(value: &str) -> Option<Self> {
        match value {
            "refusal" => Some(StopReason::ContentFilter),
            other => other.parse().ok(),
        }
    }

    /// Map an OpenAI `finish_reason`
    pub fn from_openai(value: &str) -> Option<Self> {
        match value {
            "stop" => Some(StopReason::EndTurn),
            "tool_calls" | "function_call" => Some(StopReason::ToolUse),
            "length" => Some(StopReason::MaxTokens),
            "content_filter" => Some(StopReason::ContentFilter),
            _ => None,
        }
    }

    /// Map a Gemini `finishReason`
    pub fn from_gemini(value: &str) -> Option<Self> {
        match value {
            "STOP" => Some(StopReason::EndTurn),
            "MAX_TOKENS" => Some(StopReason::MaxTokens),
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
                Some(StopReason::ContentFilter)
            }
            _ => None,
        }
    }
}

impl FromStr for StopReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "end_turn" => Ok(StopReason::EndTurn),
            "tool_use" => Ok(StopReason::ToolUse),
            "max_tokens" => Ok(StopReason::MaxTokens),
            "stop_sequence" => Ok(StopReason::StopSequence),
            "content_filter" => Ok(StopReason::ContentFilter),
            "error" => Ok(StopReason::Error),
            other => Err(format!("unknown stop reason: {other}")),
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Tool result. `"function"` is accepted as a legacy alias.
    #[serde(alias = "function")]
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "tool" | "function" => Ok(Role::Tool),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a content block inside a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Image,
    ToolUse,
    ToolResult,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::ToolUse => "tool_use",
            ContentType::ToolResult => "tool_result",
        }
    }
}

/// Wire dialect spoken by a vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiType {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    Gemini,
    #[serde(rename = "openai_compatible")]
    OpenAICompatible,
}

impl ApiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiType::Anthropic => "anthropic",
            ApiType::OpenAI => "openai",
            ApiType::Gemini => "gemini",
            ApiType::OpenAICompatible => "openai_compatible",
        }
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a canonical stream event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamEventType {
    Start,
    TextDelta,
    ToolCallStart,
    ToolCallDelta,
    ToolCallEnd,
    Stop,
    Usage,
    Error,
}

/// The canonical unit every vendor stream frame is translated into.
///
/// Only the payload field relevant to `event_type` is populated; a bare
/// `Start` carries nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub event_type: StreamEventType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_input_delta: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StreamEvent {
    /// An event of `event_type` with no payload
    pub fn new(event_type: StreamEventType) -> Self {
        Self {
            event_type,
            text: None,
            tool_call_id: None,
            tool_name: None,
            tool_input_delta: None,
            stop_reason: None,
            usage: None,
            error_message: None,
        }
    }

    pub fn start() -> Self {
        Self::new(StreamEventType::Start)
    }

    pub fn text_delta(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(StreamEventType::TextDelta)
        }
    }

    pub fn tool_call_start(id: Option<String>, name: Option<String>) -> Self {
        Self {
            tool_call_id: id,
            tool_name: name,
            ..Self::new(StreamEventType::ToolCallStart)
        }
    }

    pub fn tool_call_delta(partial_json: impl Into<String>) -> Self {
        Self {
            tool_input_delta: Some(partial_json.into()),
            ..Self::new(StreamEventType::ToolCallDelta)
        }
    }

    pub fn stop(reason: Option<StopReason>) -> Self {
        Self {
            stop_reason: reason,
            ..Self::new(StreamEventType::Stop)
        }
    }

    pub fn usage(usage: Usage) -> Self {
        Self {
            usage: Some(usage),
            ..Self::new(StreamEventType::Usage)
        }
    }

    pub fn error(message: Option<String>) -> Self {
        Self {
            error_message: message,
            ..Self::new(StreamEventType::Error)
        }
    }

    /// Attach usage counters, if any were reported
    pub fn with_usage(mut self, usage: Option<Usage>) -> Self {
        self.usage = usage;
        self
    }
}
