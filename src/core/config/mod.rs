pub mod paths;
pub mod service;
pub mod settings;
pub mod validation;

use std::path::PathBuf;

use thiserror::Error;

pub use paths::AppPaths;
pub use service::ConfigService;
pub use settings::{
    AssistantSettings, ColumnSpec, DataSourceSettings, MemorySettings, OpenAiSettings,
    RetrievalSettings, ServerSettings, Settings,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Invalid config at '{path}': {reason}")]
    Invalid { path: String, reason: String },
    #[error("missing required configuration '{0}'")]
    Missing(&'static str),
}
