//! Typed view over the merged YAML configuration.
//!
//! Every section falls back to the values the assistant has always shipped
//! with, so an almost empty `config.yml` (API key and data source path) is a
//! valid deployment.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub retrieval: RetrievalSettings,
    pub memory: MemorySettings,
    pub data_source: DataSourceSettings,
    pub assistant: AssistantSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
    pub request_timeout_secs: u64,
    pub temperature: Option<f64>,
    /// Completion length cap; the provider default applies when unset.
    pub max_tokens: Option<u32>,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            chat_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            request_timeout_secs: 60,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl OpenAiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Candidates pulled from the index before the similarity floor is applied.
    pub top_k: usize,
    /// Cosine similarity a candidate needs to count as grounding.
    pub min_similarity: f32,
    pub embed_batch_size: usize,
    /// Optional YAML list of chunks replacing the built-in corpus.
    pub corpus_path: Option<PathBuf>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_similarity: 0.45,
            embed_batch_size: 64,
            corpus_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Conversation pairs kept per user; the store holds twice as many turns.
    pub max_turns: usize,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self { max_turns: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ColumnSpec {
    fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceSettings {
    pub path: Option<PathBuf>,
    /// Alias the database is attached under, e.g. `TSD` for `TSD.SystemLoss`.
    pub schema: Option<String>,
    pub table: String,
    pub columns: Vec<ColumnSpec>,
    pub query_timeout_secs: u64,
}

impl Default for DataSourceSettings {
    fn default() -> Self {
        Self {
            path: None,
            schema: Some("TSD".to_string()),
            table: "SystemLoss".to_string(),
            columns: vec![
                ColumnSpec::new("YEAR_MONTH_DAY", "date"),
                ColumnSpec::new("TotalEnergyInput", "float"),
                ColumnSpec::new("TotalEnergyOutput", "float"),
                ColumnSpec::new("SystemLoss", "float"),
                ColumnSpec::new("PercentSystemLoss", "float"),
            ],
            query_timeout_secs: 30,
        }
    }
}

impl DataSourceSettings {
    /// Table name as the model should write it in queries.
    pub fn qualified_table(&self) -> String {
        match self.schema.as_deref() {
            Some(schema) if !schema.trim().is_empty() => format!("{}.{}", schema, self.table),
            _ => self.table.clone(),
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub name: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            name: "CEBECO III".to_string(),
        }
    }
}
