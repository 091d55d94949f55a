//! SQLite-backed executor for the SQL gateway.
//!
//! Each call opens the data file read-only, attaches it under the schema
//! alias the model writes in its queries, runs the statement and closes the
//! connection again.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Number, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo, ValueRef};

use super::gateway::{GatewayError, QueryExecutor, Record};
use crate::core::config::DataSourceSettings;

#[derive(Debug, Clone)]
pub struct SqliteQueryExecutor {
    path: PathBuf,
    schema: Option<String>,
}

impl SqliteQueryExecutor {
    pub fn new(settings: &DataSourceSettings) -> Result<Self, GatewayError> {
        let path = settings
            .path
            .clone()
            .ok_or_else(|| GatewayError::Connection("data_source.path is not set".to_string()))?;
        let schema = settings
            .schema
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(Self { path, schema })
    }

    async fn connect(&self) -> Result<SqliteConnection, GatewayError> {
        if !self.path.is_file() {
            return Err(GatewayError::Connection(format!(
                "{} does not exist",
                self.path.display()
            )));
        }

        let mut conn = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true)
            .connect()
            .await
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        if let Some(schema) = &self.schema {
            let attach = format!("ATTACH DATABASE ?1 AS {}", quote_identifier(schema));
            let attached = sqlx::query(&attach)
                .bind(self.path.to_string_lossy().into_owned())
                .execute(&mut conn)
                .await;
            if let Err(e) = attached {
                let _ = conn.close().await;
                return Err(GatewayError::Connection(e.to_string()));
            }
        }

        Ok(conn)
    }
}

#[async_trait]
impl QueryExecutor for SqliteQueryExecutor {
    async fn execute_readonly_query(&self, sql: &str) -> Result<Vec<Record>, GatewayError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(sql).fetch_all(&mut conn).await;
        if let Err(e) = conn.close().await {
            tracing::warn!("Failed to close data source connection: {}", e);
        }

        let rows = result.map_err(|e| GatewayError::Execution(e.to_string()))?;
        rows.iter().map(row_to_record).collect()
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn row_to_record(row: &SqliteRow) -> Result<Record, GatewayError> {
    let mut record = Record::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = column_value(row, i)?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

/// Decodes by the storage class of the value itself; SQLite columns are not
/// strictly typed.
fn column_value(row: &SqliteRow, index: usize) -> Result<Value, GatewayError> {
    let decode_err = |e: sqlx::Error| GatewayError::Execution(e.to_string());

    let raw = row.try_get_raw(index).map_err(decode_err)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();

    let value = match storage.as_str() {
        "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(index).map_err(decode_err)?),
        "REAL" => {
            let float = row.try_get_unchecked::<f64, _>(index).map_err(decode_err)?;
            Number::from_f64(float)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(float.to_string()))
        }
        "BLOB" => Value::String(hex::encode(
            row.try_get_unchecked::<Vec<u8>, _>(index)
                .map_err(decode_err)?,
        )),
        _ => Value::String(
            row.try_get_unchecked::<String, _>(index)
                .map_err(decode_err)?,
        ),
    };
    Ok(value)
}
