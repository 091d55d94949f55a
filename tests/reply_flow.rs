use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

use c3_assistant::agent::Route;
use c3_assistant::core::config::Settings;
use c3_assistant::history::TurnRole;
use c3_assistant::intent::{Intent, CUTOFF_REPLY};
use c3_assistant::llm::{
    ChatProvider, ChatRequest, Completion, EmbeddingProvider, LlmError, Role, ToolCall,
};
use c3_assistant::state::AppState;

/// Chunks mentioning "loss" share one direction; everything else another.
struct TopicEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for TopicEmbedder {
    fn name(&self) -> &str {
        "topic"
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(inputs
            .iter()
            .map(|text| {
                if text.to_lowercase().contains("loss") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect())
    }
}

/// First call asks for the query, second call summarises the tool payload.
struct SqlThenSummary {
    sql: String,
    requests: Mutex<Vec<ChatRequest>>,
}

#[async_trait]
impl ChatProvider for SqlThenSummary {
    fn name(&self) -> &str {
        "sql-then-summary"
    }

    async fn complete(&self, request: ChatRequest) -> Result<Completion, LlmError> {
        let has_tools = !request.tools.is_empty();
        let payload = request
            .messages
            .last()
            .filter(|m| m.role == Role::Tool)
            .and_then(|m| m.content.clone());
        self.requests.lock().unwrap().push(request);

        if has_tools {
            return Ok(Completion::ToolInvocation(ToolCall {
                id: "call_loss".to_string(),
                name: "execute_sql".to_string(),
                arguments: serde_json::json!({ "sql": self.sql }).to_string(),
            }));
        }

        let payload = payload.unwrap_or_else(|| "[]".to_string());
        let rows: serde_json::Value = serde_json::from_str(&payload)
            .map_err(|e| LlmError::Other(e.to_string()))?;
        Ok(Completion::Answer(format!(
            "  The system loss for {} was {} kWh.  ",
            rows[0]["YEAR_MONTH_DAY"].as_str().unwrap_or("?"),
            rows[0]["SystemLoss"]
        )))
    }
}

async fn seed(path: &Path) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE SystemLoss (
            YEAR_MONTH_DAY TEXT,
            TotalEnergyInput REAL,
            TotalEnergyOutput REAL,
            SystemLoss REAL,
            PercentSystemLoss REAL
        )",
    )
    .execute(&mut conn)
    .await
    .unwrap();
    let insert = "INSERT INTO SystemLoss VALUES ('2024-05-31', 1200.0, 1110.0, 90.0, 7.5)";
    sqlx::query(insert)
        .execute(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();
}

async fn app(
    dir: &TempDir,
    chat: Arc<SqlThenSummary>,
    embedder: Arc<TopicEmbedder>,
) -> Arc<AppState> {
    let db = dir.path().join("tsd.db");
    seed(&db).await;

    let mut settings = Settings::default();
    settings.data_source.path = Some(db);

    settings.openai.max_tokens = Some(256);

    AppState::build(settings, chat, embedder).await.unwrap()
}

fn fixtures() -> (Arc<SqlThenSummary>, Arc<TopicEmbedder>) {
    let chat = Arc::new(SqlThenSummary {
        sql: "SELECT YEAR_MONTH_DAY, SystemLoss FROM TSD.SystemLoss ORDER BY YEAR_MONTH_DAY DESC LIMIT 1"
            .to_string(),
        requests: Mutex::new(Vec::new()),
    });
    let embedder = Arc::new(TopicEmbedder {
        calls: AtomicUsize::new(0),
    });
    (chat, embedder)
}

#[tokio::test]
async fn cutoff_question_gets_the_schedule_without_model_calls() {
    let dir = TempDir::new().unwrap();
    let (chat, embedder) = fixtures();
    let state = app(&dir, chat.clone(), embedder.clone()).await;
    let embeds_at_startup = embedder.calls.load(Ordering::SeqCst);

    let reply = state
        .orchestrator
        .handle_message("psid-1", "What's the cut-off date for Balamban?")
        .await;

    assert_eq!(reply.text, CUTOFF_REPLY);
    assert_eq!(reply.report.route, Route::Canned(Intent::Cutoff));
    assert!(chat.requests.lock().unwrap().is_empty());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), embeds_at_startup);
}

#[tokio::test]
async fn loss_question_runs_the_query_and_summarises() {
    let dir = TempDir::new().unwrap();
    let (chat, embedder) = fixtures();
    let state = app(&dir, chat.clone(), embedder).await;

    let reply = state
        .orchestrator
        .handle_message("psid-1", "How many kWh loss last month?")
        .await;

    assert_eq!(reply.text, "The system loss for 2024-05-31 was 90.0 kWh.");
    assert_eq!(reply.report.route, Route::Generated);
    assert!(reply.report.grounding >= 1);
    assert!(reply.report.tool_invoked);
    assert_eq!(reply.report.rows, Some(1));

    let requests = chat.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    let system = requests[0].messages[0].content.clone().unwrap();
    assert!(system.contains("System Loss"));
    assert!(requests[1].tools.is_empty());
    assert!(requests.iter().all(|r| r.max_tokens == Some(256)));

    let history = state.orchestrator.memory().history("psid-1").await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, TurnRole::User);
    assert_eq!(history[0].text, "How many kWh loss last month?");
    assert_eq!(history[1].role, TurnRole::Assistant);
    assert_eq!(history[1].text, reply.text);
}

#[tokio::test]
async fn reset_twice_is_the_same_as_once() {
    let dir = TempDir::new().unwrap();
    let (chat, embedder) = fixtures();
    let state = app(&dir, chat, embedder).await;

    state
        .orchestrator
        .handle_message("psid-1", "my bill please")
        .await;
    state.orchestrator.reset("psid-1").await;
    let history = state.orchestrator.memory().history("psid-1").await;
    assert!(history.is_empty());
    state.orchestrator.reset("psid-1").await;
    let history = state.orchestrator.memory().history("psid-1").await;
    assert!(history.is_empty());

    state.orchestrator.reset("never-seen").await;
}
