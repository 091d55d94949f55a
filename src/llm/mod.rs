pub mod openai;
pub mod provider;
pub mod types;

#[cfg(test)]
mod tests;

pub use openai::OpenAiClient;
pub use provider::{ChatProvider, EmbeddingProvider, LlmError};
pub use types::{ChatMessage, ChatRequest, Completion, Role, ToolCall, ToolDefinition};
