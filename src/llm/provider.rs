use async_trait::async_trait;
use thiserror::Error;

use super::types::{ChatRequest, Completion};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// return the provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// chat completion that may end in a capability invocation when tools are declared
    async fn complete(&self, request: ChatRequest) -> Result<Completion, LlmError>;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    /// generate one embedding per input, in input order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError>;
}
