use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::agent::AnswerOrchestrator;
use crate::core::config::{AppPaths, ConfigService, Settings};
use crate::history::ConversationStore;
use crate::llm::{ChatProvider, EmbeddingProvider, OpenAiClient};
use crate::rag::{load_corpus, Retriever};
use crate::tools::{SafeQueryGateway, SqliteQueryExecutor};

pub mod error;

use error::InitializationError;

/// Shared application state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub orchestrator: Arc<AnswerOrchestrator>,
}

impl AppState {
    /// Loads configuration and wires the OpenAI client into [`AppState::build`].
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config = ConfigService::new(paths.clone());
        let mut settings = config
            .load_settings()
            .map_err(InitializationError::Config)?;
        resolve_relative(&paths.project_root, &mut settings.data_source.path);
        resolve_relative(&paths.project_root, &mut settings.retrieval.corpus_path);
        if let Ok(effective) = serde_json::to_value(&settings) {
            tracing::debug!(
                "Effective configuration: {}",
                config.redact_sensitive_values(&effective)
            );
        }

        let client = OpenAiClient::new(&settings.openai)
            .map_err(InitializationError::Llm)?;

        let client = Arc::new(client);
        Self::build(settings, client.clone(), client).await
    }

    /// Embeds the corpus and assembles the orchestrator. Any failure here is fatal.
    pub async fn build(
        settings: Settings,
        chat: Arc<dyn ChatProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Arc<Self>, InitializationError> {
        let corpus = load_corpus(settings.retrieval.corpus_path.as_deref())
            .map_err(InitializationError::Corpus)?;
        let retriever = Retriever::build(embedder, corpus, &settings.retrieval)
            .await
            .map_err(InitializationError::KnowledgeBase)?;

        let executor = SqliteQueryExecutor::new(&settings.data_source)
            .map_err(InitializationError::Gateway)?;
        if let Some(path) = settings.data_source.path.as_deref() {
            if !path.is_file() {
                tracing::warn!(
                    "Data source {} not found; SQL queries will fail until it exists",
                    path.display()
                );
            }
        }
        let timeout = settings.data_source.query_timeout();
        let gateway = SafeQueryGateway::new(Arc::new(executor), timeout);
        let memory = ConversationStore::new(settings.memory.max_turns);

        let orchestrator = AnswerOrchestrator::new(
            Arc::new(retriever),
            chat,
            gateway,
            memory,
            &settings,
        );

        Ok(Arc::new(AppState {
            settings: Arc::new(settings),
            orchestrator: Arc::new(orchestrator),
        }))
    }
}

fn resolve_relative(root: &Path, path: &mut Option<PathBuf>) {
    if let Some(p) = path.as_mut() {
        if p.is_relative() {
            *p = root.join(&*p);
        }
    }
}
