use serde_json::json;

use super::openai::{parse_completion, parse_embeddings, WireChatRequest};
use super::types::{ChatMessage, ChatRequest, Completion, ToolCall, ToolDefinition};
use super::LlmError;
use crate::core::config::OpenAiSettings;
use crate::llm::OpenAiClient;

fn sql_tool() -> ToolDefinition {
    ToolDefinition {
        name: "execute_sql".to_string(),
        description: "Run a SELECT query".to_string(),
        parameters: json!({
            "type": "object",
            "properties": { "sql": { "type": "string" } },
            "required": ["sql"]
        }),
    }
}

#[test]
fn request_declares_tool_with_auto_choice() {
    let request = ChatRequest::new(vec![
        ChatMessage::system("You are the assistant."),
        ChatMessage::user("How many kWh loss last month?"),
    ])
    .with_tool(sql_tool());

    let wire = WireChatRequest::from_request("gpt-3.5-turbo", &request);
    let body = serde_json::to_value(wire).unwrap();

    assert_eq!(body["model"], "gpt-3.5-turbo");
    assert_eq!(body["tool_choice"], "auto");
    assert_eq!(body["tools"][0]["type"], "function");
    assert_eq!(body["tools"][0]["function"]["name"], "execute_sql");
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body.get("temperature").is_none());
    assert!(body.get("max_tokens").is_none());
}

#[test]
fn request_carries_sampling_limits() {
    let request = ChatRequest::new(vec![ChatMessage::user("hi")])
        .with_temperature(Some(0.2))
        .with_max_tokens(Some(256));

    let wire = WireChatRequest::from_request("m", &request);
    let body = serde_json::to_value(wire).unwrap();

    assert_eq!(body["temperature"], 0.2);
    assert_eq!(body["max_tokens"], 256);
}

#[test]
fn request_without_tools_omits_tool_fields() {
    let call = ToolCall {
        id: "call_1".to_string(),
        name: "execute_sql".to_string(),
        arguments: r#"{"sql":"SELECT 1"}"#.to_string(),
    };
    let request = ChatRequest::new(vec![
        ChatMessage::user("hi"),
        ChatMessage::tool_invocation(call),
        ChatMessage::tool_result("call_1", "[]"),
    ]);

    let wire = WireChatRequest::from_request("m", &request);
    let body = serde_json::to_value(wire).unwrap();

    assert!(body.get("tools").is_none());
    assert!(body.get("tool_choice").is_none());
    assert_eq!(body["messages"][1]["content"], serde_json::Value::Null);
    let calls = &body["messages"][1]["tool_calls"];
    assert_eq!(calls[0]["function"]["name"], "execute_sql");
    assert_eq!(body["messages"][2]["role"], "tool");
    assert_eq!(body["messages"][2]["tool_call_id"], "call_1");
}

#[test]
fn completion_with_content_is_an_answer() {
    let response = serde_json::from_value(json!({
        "choices": [{ "message": { "role": "assistant", "content": "  Hello  " } }]
    }))
    .unwrap();

    assert_eq!(
        parse_completion(response).unwrap(),
        Completion::Answer("  Hello  ".to_string())
    );
}

#[test]
fn completion_with_tool_call_is_an_invocation() {
    let response = serde_json::from_value(json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": { "name": "execute_sql", "arguments": "{\"sql\":\"SELECT 1\"}" }
                }]
            }
        }]
    }))
    .unwrap();

    match parse_completion(response).unwrap() {
        Completion::ToolInvocation(call) => {
            assert_eq!(call.id, "call_abc");
            assert_eq!(call.name, "execute_sql");
            assert_eq!(call.arguments, "{\"sql\":\"SELECT 1\"}");
        }
        other => panic!("expected tool invocation, got {:?}", other),
    }
}

#[test]
fn completion_without_choices_is_rejected() {
    let response = serde_json::from_value(json!({ "choices": [] })).unwrap();
    assert!(matches!(
        parse_completion(response),
        Err(LlmError::InvalidResponse { .. })
    ));
}

#[test]
fn embeddings_are_reordered_by_index() {
    let response = serde_json::from_value(json!({
        "data": [
            { "index": 1, "embedding": [0.0, 1.0] },
            { "index": 0, "embedding": [1.0, 0.0] }
        ]
    }))
    .unwrap();

    let vectors = parse_embeddings(response, 2).unwrap();
    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[test]
fn embedding_count_mismatch_is_rejected() {
    let response = serde_json::from_value(json!({
        "data": [{ "index": 0, "embedding": [1.0] }]
    }))
    .unwrap();

    assert!(parse_embeddings(response, 2).is_err());
}

#[test]
fn client_requires_api_key() {
    let settings = OpenAiSettings::default();
    assert!(OpenAiClient::new(&settings).is_err());

    let settings = OpenAiSettings {
        api_key: Some("sk-test".to_string()),
        ..OpenAiSettings::default()
    };
    assert!(OpenAiClient::new(&settings).is_ok());
}

#[tokio::test]
#[ignore]
async fn test_live_openai_embedding() {
    use crate::llm::EmbeddingProvider;

    let settings = OpenAiSettings {
        api_key: std::env::var("OPENAI_API_KEY").ok(),
        ..OpenAiSettings::default()
    };
    let client = OpenAiClient::new(&settings)
        .expect("OPENAI_API_KEY must be set");
    let vectors = client
        .embed(&["Reporting an outage".to_string()])
        .await
        .expect("embedding request should succeed");
    println!("embedding dimension: {}", vectors[0].len());
}
