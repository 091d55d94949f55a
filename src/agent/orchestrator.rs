//! Turn handling: route, retrieve, compose, optional SQL round-trip, finalize.
//!
//! Every per-turn failure ends up as a short warning in the reply text. The
//! turn always completes and the exchange is always stored.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::instructions::{build_system_instructions, compose_messages};
use crate::core::config::Settings;
use crate::history::ConversationStore;
use crate::intent::{Intent, IntentRouter};
use crate::llm::{ChatMessage, ChatProvider, ChatRequest, Completion, LlmError, ToolDefinition};
use crate::rag::Retriever;
use crate::tools::{
    sql_from_arguments, tool_definition, GatewayError, SafeQueryGateway, EXECUTE_SQL_TOOL,
};

pub const RESET_REPLY: &str = "Conversation context cleared ✅";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Reset,
    Canned(Intent),
    Generated,
}

/// What happened during one turn, for logs and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    pub route: Route,
    pub grounding: usize,
    pub tool_invoked: bool,
    pub rows: Option<usize>,
    pub warning: Option<String>,
}

impl TurnReport {
    fn new(route: Route) -> Self {
        Self {
            route,
            grounding: 0,
            tool_invoked: false,
            rows: None,
            warning: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub report: TurnReport,
}

#[derive(Debug, Error)]
enum TurnError {
    #[error("⚠️ SQL error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("⚠️ Sorry, the assistant is unavailable right now ({0}).")]
    Model(#[from] LlmError),
    #[error("⚠️ The model requested an unknown tool '{0}'.")]
    UnknownTool(String),
    #[error("⚠️ The model requested another query instead of answering.")]
    SecondInvocation,
    #[error("⚠️ Could not encode query results: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct AnswerOrchestrator {
    router: IntentRouter,
    retriever: Arc<Retriever>,
    chat: Arc<dyn ChatProvider>,
    gateway: SafeQueryGateway,
    memory: ConversationStore,
    tool: ToolDefinition,
    assistant_name: String,
    table: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl AnswerOrchestrator {
    pub fn new(
        retriever: Arc<Retriever>,
        chat: Arc<dyn ChatProvider>,
        gateway: SafeQueryGateway,
        memory: ConversationStore,
        settings: &Settings,
    ) -> Self {
        Self {
            router: IntentRouter::default(),
            retriever,
            chat,
            gateway,
            memory,
            tool: tool_definition(&settings.data_source),
            assistant_name: settings.assistant.name.clone(),
            table: settings.data_source.qualified_table(),
            temperature: settings.openai.temperature,
            max_tokens: settings.openai.max_tokens,
        }
    }

    pub fn with_router(mut self, router: IntentRouter) -> Self {
        self.router = router;
        self
    }

    pub fn memory(&self) -> &ConversationStore {
        &self.memory
    }

    /// Inbound entry point: `reset`/`restart` clear memory, anything else is answered.
    pub async fn handle_message(&self, user_id: &str, text: &str) -> Reply {
        let text = text.trim();
        if is_reset_command(text) {
            self.reset(user_id).await;
            return Reply {
                text: RESET_REPLY.to_string(),
                report: TurnReport::new(Route::Reset),
            };
        }
        self.respond(user_id, text).await
    }

    pub async fn generate_reply(&self, user_id: &str, message: &str) -> String {
        self.respond(user_id, message).await.text
    }

    pub async fn reset(&self, user_id: &str) {
        if self.memory.clear(user_id).await {
            tracing::info!("Conversation reset for {}", user_id);
        }
    }

    pub async fn respond(&self, user_id: &str, message: &str) -> Reply {
        let intent = self.router.classify(message);

        let (answer, report) = match intent.canned_reply() {
            Some(reply) => (reply.to_string(), TurnReport::new(Route::Canned(intent))),
            None => {
                let mut report = TurnReport::new(Route::Generated);
                let answer = match self.generate(user_id, message, &mut report).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        tracing::warn!("Turn for {} degraded: {:?}", user_id, e);
                        let warning = e.to_string();
                        report.warning = Some(warning.clone());
                        warning
                    }
                };
                (answer, report)
            }
        };

        let answer = answer.trim().to_string();
        self.memory
            .append_exchange(user_id, message, answer.clone())
            .await;

        tracing::info!(
            "Replied to {} via {:?} (grounding={}, tool={}, rows={:?})",
            user_id,
            report.route,
            report.grounding,
            report.tool_invoked,
            report.rows
        );
        Reply {
            text: answer,
            report,
        }
    }

    async fn generate(
        &self,
        user_id: &str,
        message: &str,
        report: &mut TurnReport,
    ) -> Result<String, TurnError> {
        let grounding = match self.retriever.retrieve(message).await {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::warn!("Retrieval failed, answering without grounding: {}", e);
                Vec::new()
            }
        };
        report.grounding = grounding.len();

        let history = self.memory.history(user_id).await;
        let system = build_system_instructions(
            &self.assistant_name,
            &self.table,
            &grounding,
            chrono::Local::now().date_naive(),
        );
        let mut messages = compose_messages(system, &history, message);

        let first = ChatRequest::new(messages.clone())
            .with_tool(self.tool.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        let call = match self.chat.complete(first).await? {
            Completion::Answer(text) => return Ok(text),
            Completion::ToolInvocation(call) => call,
        };
        report.tool_invoked = true;

        if call.name != EXECUTE_SQL_TOOL {
            return Err(TurnError::UnknownTool(call.name));
        }
        let sql = sql_from_arguments(&call.arguments)?;
        tracing::info!("Model requested SQL: {}", sql);
        let rows = self.gateway.execute(&sql).await?;
        report.rows = Some(rows.len());
        let payload = serde_json::to_string(&rows)?;

        let call_id = call.id.clone();
        messages.push(ChatMessage::tool_invocation(call));
        messages.push(ChatMessage::tool_result(call_id, payload));

        // No tools on the follow-up: only one query round per turn.
        let followup = ChatRequest::new(messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        match self.chat.complete(followup).await? {
            Completion::Answer(text) => Ok(text),
            Completion::ToolInvocation(extra) => {
                tracing::warn!("Model asked for a second tool call ({})", extra.name);
                Err(TurnError::SecondInvocation)
            }
        }
    }
}

fn is_reset_command(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered == "reset" || lowered == "restart"
}
