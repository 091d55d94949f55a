//! OpenAI-compatible chat completion and embedding client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::provider::{ChatProvider, EmbeddingProvider, LlmError};
use super::types::{ChatMessage, ChatRequest, Completion, ToolCall, ToolDefinition};
use crate::core::config::OpenAiSettings;

const PROVIDER: &str = "openai";

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    chat_model: String,
    embedding_model: String,
}

impl OpenAiClient {
    pub fn new(settings: &OpenAiSettings) -> Result<Self, LlmError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LlmError::Other("missing OpenAI API key".to_string()))?;

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| LlmError::Other("invalid OpenAI API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(settings.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| LlmError::Other(format!("failed to build OpenAI HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            chat_model: settings.chat_model.clone(),
            embedding_model: settings.embedding_model.clone(),
        })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LlmError::Status {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        res.json::<R>().await.map_err(|e| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: ChatRequest) -> Result<Completion, LlmError> {
        let body = WireChatRequest::from_request(&self.chat_model, &request);
        let response: WireChatResponse = self.post_json("/chat/completions", &body).await?;
        parse_completion(response)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = EmbeddingRequest {
            model: &self.embedding_model,
            input: inputs,
        };
        let response: EmbeddingResponse = self.post_json("/embeddings", &body).await?;
        parse_embeddings(response, inputs.len())
    }
}

fn transport_error(source: reqwest::Error) -> LlmError {
    LlmError::Transport {
        provider: PROVIDER.to_string(),
        source,
    }
}

fn invalid_response(message: impl Into<String>) -> LlmError {
    LlmError::InvalidResponse {
        provider: PROVIDER.to_string(),
        message: message.into(),
    }
}

pub(crate) fn parse_completion(response: WireChatResponse) -> Result<Completion, LlmError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| invalid_response("no choices in completion"))?;

    let mut tool_calls = message.tool_calls.unwrap_or_default().into_iter();
    if let Some(call) = tool_calls.next() {
        let extra = tool_calls.count();
        if extra > 0 {
            tracing::warn!(
                "Model requested {} extra tool calls; only the first is honoured",
                extra
            );
        }
        return Ok(Completion::ToolInvocation(ToolCall {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        }));
    }

    message
        .content
        .map(Completion::Answer)
        .ok_or_else(|| invalid_response("completion has neither content nor tool call"))
}

pub(crate) fn parse_embeddings(
    mut response: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, LlmError> {
    response.data.sort_by_key(|entry| entry.index);
    if response.data.len() != expected {
        return Err(invalid_response(format!(
            "returned {} embeddings for {} inputs",
            response.data.len(),
            expected
        )));
    }
    Ok(response
        .data
        .into_iter()
        .map(|entry| entry.embedding)
        .collect())
}

#[derive(Serialize)]
pub(crate) struct WireChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> WireChatRequest<'a> {
    pub(crate) fn from_request(model: &'a str, request: &'a ChatRequest) -> Self {
        let tools: Vec<WireTool<'a>> = request.tools.iter().map(WireTool::from).collect();
        let tool_choice = if tools.is_empty() { None } else { Some("auto") };
        Self {
            model,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            tools,
            tool_choice,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.as_deref(),
            tool_calls: message
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    kind: "function".to_string(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect(),
            tool_call_id: message.tool_call_id.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolDefinition,
}

impl<'a> From<&'a ToolDefinition> for WireTool<'a> {
    fn from(tool: &'a ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: tool,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireChatResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
