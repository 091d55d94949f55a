use chrono::NaiveDate;

use crate::history::{ConversationTurn, TurnRole};
use crate::llm::{ChatMessage, Role};
use crate::rag::RetrievedChunk;
use crate::tools::EXECUTE_SQL_TOOL;

pub fn build_system_instructions(
    assistant_name: &str,
    table: &str,
    grounding: &[RetrievedChunk],
    today: NaiveDate,
) -> String {
    let knowledge = grounding
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are the {assistant_name} assistant. You have a knowledge base and can call \
{tool}(sql) to fetch system-loss data from {table}.\n\
Today's date is {today}.\n\n\
Knowledge Base:\n{knowledge}",
        tool = EXECUTE_SQL_TOOL,
        today = today.format("%Y-%m-%d"),
    )
}

/// System instruction, then stored history oldest first, then the new message.
pub fn compose_messages(
    system: String,
    history: &[ConversationTurn],
    user_message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history.iter().map(|turn| {
        let role = match turn.role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        };
        ChatMessage::text(role, turn.text.clone())
    }));
    messages.push(ChatMessage::user(user_message));
    messages
}
