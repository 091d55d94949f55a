use thiserror::Error;

use crate::core::config::ConfigError;
use crate::llm::LlmError;
use crate::rag::{CorpusError, RetrievalError};
use crate::tools::GatewayError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[source] ConfigError),

    #[error("Failed to load knowledge corpus: {0}")]
    Corpus(#[source] CorpusError),

    #[error("Failed to build knowledge base: {0}")]
    KnowledgeBase(#[source] RetrievalError),

    #[error("Failed to initialize LLM client: {0}")]
    Llm(#[source] LlmError),

    #[error("Failed to initialize SQL gateway: {0}")]
    Gateway(#[source] GatewayError),
}
