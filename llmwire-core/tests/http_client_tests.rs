//! reqwest transport and vendor clients against a mock server

use llmwire_core::http::{json_content_type, Header, HttpClient, HttpTransport};
use llmwire_core::protocol::{ApiType, RequestConfig, StopReason, StreamEventType};
use llmwire_core::providers::{
    decode_stream, AnthropicClient, GeminiClient, OpenAIClient, Provider, ProviderError,
    ReliableProvider, RetryConfig,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANTHROPIC_STREAM: &str = concat!(
    "event: message_start\n",
    "data: {\"type\":\"message_start\",\"message\":{\"usage\":{\"input_tokens\":12}}}\n\n",
    "event: content_block_start\n",
    "data: {\"type\":\"content_block_start\",\"index\":0,\"content_block\":{\"type\":\"text\",\"text\":\"\"}}\n\n",
    "event: content_block_delta\n",
    "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hi!\"}}\n\n",
    "event: message_delta\n",
    "data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":3}}\n\n",
    "event: message_stop\n",
    "data: {\"type\":\"message_stop\"}\n\n",
);

fn transport() -> Arc<HttpClient> {
    Arc::new(HttpClient::new().expect("Failed to create client"))
}

#[tokio::test]
async fn test_post_preserves_status_and_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(header("x-custom", "1"))
        .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let response = client
        .post(
            &format!("{}/echo", mock_server.uri()),
            &[Header::new("x-custom", "1"), json_content_type()],
            "{}".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 418);
    assert!(!response.is_success());
    assert_eq!(response.text(), "teapot");
}

#[tokio::test]
async fn test_post_sse_sets_accept_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stream"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string("data: x\n\n"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let response = client
        .post_sse(&format!("{}/stream", mock_server.uri()), &[], String::new())
        .await
        .unwrap();
    assert_eq!(response.sse_events().len(), 1);
}

#[tokio::test]
async fn test_request_timeout_maps_to_timeout_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let client =
        HttpClient::with_config(Duration::from_secs(1), Duration::from_millis(50), 1).unwrap();
    let err = client
        .post(&mock_server.uri(), &[], String::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Timeout(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = HttpClient::with_config(Duration::from_millis(200), Duration::from_secs(1), 1)
        .unwrap();
    let err = client
        .post("http://127.0.0.1:9/unreachable", &[], String::new())
        .await
        .unwrap_err();
    assert!(err.is_transient(), "got {err:?}");
}

#[tokio::test]
async fn test_anthropic_end_to_end() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-5",
            "max_tokens": 512,
            "stream": true,
            "system": [{"type": "text", "text": "Be brief"}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(ANTHROPIC_STREAM),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AnthropicClient::new(transport());
    let config = RequestConfig::new("claude-sonnet-4-5", "sk-ant-test")
        .with_system_prompt("Be brief")
        .with_max_tokens(512)
        .with_base_url(mock_server.uri());
    let messages = r#"[{"role":"user","content":[{"type":"text","text":"Hello"}]}]"#;

    let response = client.send_message(&config, messages, None).await.unwrap();
    assert!(response.is_success());

    let events = decode_stream(ApiType::Anthropic, &response.body);
    let text: String = events.iter().filter_map(|e| e.text.as_deref()).collect();
    assert_eq!(text, "Hi!");
    assert_eq!(events.last().unwrap().event_type, StreamEventType::Stop);
    assert_eq!(events[3].stop_reason, Some(StopReason::EndTurn));
}

#[tokio::test]
async fn test_openai_non_streaming_with_retry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"tool_choice": "auto"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}]
        })))
        .mount(&mock_server)
        .await;

    let provider = ReliableProvider::new(
        OpenAIClient::new(transport()),
        RetryConfig::immediate(2),
    );
    let config = RequestConfig::new("gpt-4o", "sk-test")
        .with_stream(false)
        .with_base_url(mock_server.uri());

    let response = provider
        .send_message(&config, r#"[{"role":"user","content":"hi"}]"#, Some("[]"))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(provider.total_attempts(), 2);
}

#[tokio::test]
async fn test_gemini_key_in_query_not_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .and(query_param("key", "AIza-test"))
        .and(body_partial_json(json!({"generationConfig": {"maxOutputTokens": 64}})))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"yo\"}]},\"finishReason\":\"STOP\"}]}\n\n",
        ))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new(transport());
    let config = RequestConfig::new("gemini-2.0-flash", "AIza-test")
        .with_max_tokens(64)
        .with_base_url(mock_server.uri());
    let response = client
        .send_message(&config, r#"[{"role":"user","parts":[{"text":"hi"}]}]"#, None)
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("x-goog-api-key").is_none());
    assert!(requests[0].headers.get("authorization").is_none());

    let events = decode_stream(ApiType::Gemini, &response.body);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].text.as_deref(), Some("yo"));
}

#[tokio::test]
async fn test_gemini_connect_error_does_not_expose_key() {
    let transport = Arc::new(
        HttpClient::with_config(Duration::from_millis(200), Duration::from_secs(1), 1).unwrap(),
    );
    let client = GeminiClient::new(transport);
    let config =
        RequestConfig::new("gemini-pro", "AIzaSECRETKEY123").with_base_url("http://127.0.0.1:1");

    let err = client
        .send_message(&config, r#"[{"role":"user","parts":[{"text":"hi"}]}]"#, None)
        .await
        .unwrap_err();

    assert!(err.is_transient(), "got {err:?}");
    assert!(!err.to_string().contains("SECRETKEY"), "leaked: {err}");
    assert!(!format!("{err:?}").contains("SECRETKEY"));
}

#[tokio::test]
async fn test_gemini_timeout_through_retries_does_not_expose_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let transport = Arc::new(
        HttpClient::with_config(Duration::from_secs(1), Duration::from_millis(50), 1).unwrap(),
    );
    let provider = ReliableProvider::new(GeminiClient::new(transport), RetryConfig::immediate(1));
    let config =
        RequestConfig::new("gemini-pro", "AIzaSECRETKEY123").with_base_url(mock_server.uri());

    let err = provider
        .send_message(&config, r#"[{"role":"user","parts":[{"text":"hi"}]}]"#, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Timeout(_)), "got {err:?}");
    assert!(!err.to_string().contains("SECRETKEY"), "leaked: {err}");
    assert_eq!(provider.total_attempts(), 2);
}
