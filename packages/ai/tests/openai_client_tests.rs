// ABOUTME: HTTP-level tests for the OpenAI client against a mock server
// ABOUTME: Covers text replies, JSON mode, conversations and API errors

use elbitat_ai::{AIService, AIServiceError, ChatMessage};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 }
    })
}

fn service_for(server: &MockServer) -> AIService {
    AIService::with_config(
        Some("test-key".to_string()),
        "gpt-4o-mini".to_string(),
        server.uri(),
    )
}

#[tokio::test]
async fn test_generate_text_sends_system_and_user_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "You write ads" },
                { "role": "user", "content": "Write one" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Sunset at Elbitat")))
        .expect(1)
        .mount(&server)
        .await;

    let response = service_for(&server)
        .generate_text("Write one".to_string(), Some("You write ads".to_string()))
        .await
        .unwrap();

    assert_eq!(response.data, "Sunset at Elbitat");
    assert_eq!(response.usage.total_tokens(), 20);
}

#[derive(Debug, PartialEq, Deserialize)]
struct Plan {
    name: String,
}

#[tokio::test]
async fn test_generate_structured_uses_json_mode_and_strips_fences() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "response_format": { "type": "json_object" } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("```json\n{\"name\": \"Autumn\"}\n```")),
        )
        .mount(&server)
        .await;

    let response = service_for(&server)
        .generate_structured::<Plan>("plan".to_string(), None)
        .await
        .unwrap();

    assert_eq!(
        response.data,
        Plan {
            name: "Autumn".to_string()
        }
    );
}

#[tokio::test]
async fn test_structured_parse_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("not json at all")))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .generate_structured::<Plan>("plan".to_string(), None)
        .await;

    assert!(matches!(result, Err(AIServiceError::ParseError(_))));
}

#[tokio::test]
async fn test_chat_sends_full_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "user", "content": "Plan July" },
                { "role": "assistant", "content": "What budget?" },
                { "role": "user", "content": "Small" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Got it")))
        .mount(&server)
        .await;

    let history = vec![
        ChatMessage::user("Plan July"),
        ChatMessage::assistant("What budget?"),
        ChatMessage::user("Small"),
    ];
    let response = service_for(&server)
        .chat(&history, Default::default())
        .await
        .unwrap();

    assert_eq!(response.data, "Got it");
}

#[tokio::test]
async fn test_api_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let result = service_for(&server)
        .generate_text("hi".to_string(), None)
        .await;

    match result {
        Err(AIServiceError::ApiError(msg)) => assert!(msg.contains("rate limited")),
        other => panic!("expected ApiError, got {:?}", other.map(|r| r.data)),
    }
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let result = service_for(&server).generate_text("hi".to_string(), None).await;
    assert!(matches!(result, Err(AIServiceError::InvalidResponse)));
}
