use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::core::config::DataSourceSettings;
use crate::llm::ToolDefinition;

pub const EXECUTE_SQL_TOOL: &str = "execute_sql";

/// One result row: column name to value, in select-list order.
pub type Record = Map<String, Value>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),
    #[error("could not connect to the data source: {0}")]
    Connection(String),
    #[error("{0}")]
    Execution(String),
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs an already validated statement. Implementations must not keep a
    /// connection open once the call returns.
    async fn execute_readonly_query(&self, sql: &str) -> Result<Vec<Record>, GatewayError>;
}

/// Rejects anything that does not start with `select` once trimmed.
pub fn validate_readonly(sql: &str) -> Result<(), GatewayError> {
    if sql.trim().to_lowercase().starts_with("select") {
        Ok(())
    } else {
        Err(GatewayError::Validation(
            "Only SELECT queries are allowed.".to_string(),
        ))
    }
}

#[derive(Deserialize)]
struct SqlArguments {
    sql: String,
}

/// Extracts the `sql` argument from the raw JSON the model produced.
pub fn sql_from_arguments(arguments: &str) -> Result<String, GatewayError> {
    serde_json::from_str::<SqlArguments>(arguments)
        .map(|args| args.sql)
        .map_err(|e| GatewayError::Validation(format!("invalid tool arguments: {}", e)))
}

/// Capability declaration handed to the model.
pub fn tool_definition(data_source: &DataSourceSettings) -> ToolDefinition {
    let table = data_source.qualified_table();
    let mut description = format!(
        "Run a SELECT query against the {} table and return JSON results.\nAvailable columns:\n",
        table
    );
    for column in &data_source.columns {
        description.push_str(&format!("  • {} ({})\n", column.name, column.kind));
    }
    description.push_str("Only read-only SELECT statements are allowed.");

    ToolDefinition {
        name: EXECUTE_SQL_TOOL.to_string(),
        description,
        parameters: json!({
            "type": "object",
            "properties": {
                "sql": {
                    "type": "string",
                    "description": format!("A safe SQL SELECT statement against {}.", table)
                }
            },
            "required": ["sql"]
        }),
    }
}

/// Validates statements and runs them through an executor under a timeout.
#[derive(Clone)]
pub struct SafeQueryGateway {
    executor: Arc<dyn QueryExecutor>,
    timeout: Duration,
}

impl SafeQueryGateway {
    pub fn new(executor: Arc<dyn QueryExecutor>, timeout: Duration) -> Self {
        Self { executor, timeout }
    }

    pub async fn execute(&self, sql: &str) -> Result<Vec<Record>, GatewayError> {
        validate_readonly(sql)?;

        let records = tokio::time::timeout(self.timeout, self.executor.execute_readonly_query(sql))
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))??;

        tracing::info!("SQL gateway returned {} rows", records.len());
        Ok(records)
    }
}
