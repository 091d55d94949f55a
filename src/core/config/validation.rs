use serde_json::{Map, Value};

use super::ConfigError;

pub fn validate_config(config: &Value) -> Result<(), ConfigError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_optional_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 1, 65535)?;
    }

    if let Some(openai) = expect_optional_object(root, "openai")? {
        validate_optional_string_field(openai, "openai.base_url", "base_url")?;
        validate_optional_string_field(openai, "openai.api_key", "api_key")?;
        validate_optional_string_field(openai, "openai.chat_model", "chat_model")?;
        validate_optional_string_field(openai, "openai.embedding_model", "embedding_model")?;
        validate_u64_field(
            openai,
            "openai.request_timeout_secs",
            "request_timeout_secs",
            1,
            3_600,
        )?;
        validate_f64_field(openai, "openai.temperature", "temperature", 0.0, 2.0)?;
        validate_u64_field(openai, "openai.max_tokens", "max_tokens", 1, 32_768)?;
    }

    if let Some(retrieval) = expect_optional_object(root, "retrieval")? {
        validate_u64_field(retrieval, "retrieval.top_k", "top_k", 1, 1_000)?;
        validate_f64_field(
            retrieval,
            "retrieval.min_similarity",
            "min_similarity",
            -1.0,
            1.0,
        )?;
        validate_u64_field(
            retrieval,
            "retrieval.embed_batch_size",
            "embed_batch_size",
            1,
            2_048,
        )?;
        validate_optional_string_field(retrieval, "retrieval.corpus_path", "corpus_path")?;
    }

    if let Some(memory) = expect_optional_object(root, "memory")? {
        validate_u64_field(memory, "memory.max_turns", "max_turns", 1, 10_000)?;
    }

    if let Some(data_source) = expect_optional_object(root, "data_source")? {
        validate_optional_string_field(data_source, "data_source.path", "path")?;
        validate_optional_string_field(data_source, "data_source.schema", "schema")?;
        validate_optional_string_field(data_source, "data_source.table", "table")?;
        validate_u64_field(
            data_source,
            "data_source.query_timeout_secs",
            "query_timeout_secs",
            1,
            3_600,
        )?;

        if let Some(columns) = data_source.get("columns") {
            let items = columns
                .as_array()
                .ok_or_else(|| config_type_error("data_source.columns", "array"))?;
            for (index, item) in items.iter().enumerate() {
                let path_prefix = format!("data_source.columns[{}]", index);
                let entry = item
                    .as_object()
                    .ok_or_else(|| config_type_error(&path_prefix, "object"))?;
                validate_required_string_field(entry, &format!("{}.name", path_prefix), "name")?;
                validate_required_string_field(entry, &format!("{}.type", path_prefix), "type")?;
            }
        }
    }

    if let Some(assistant) = expect_optional_object(root, "assistant")? {
        validate_optional_string_field(assistant, "assistant.name", "name")?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(config_type_error(key, "object")),
    }
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(range_error(path, min, max));
    }
    Ok(())
}

fn validate_f64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() {
        return Ok(());
    }
    let Some(number) = value.as_f64() else {
        return Err(config_type_error(path, "number"));
    };
    if number < min || number > max {
        return Err(range_error(path, min, max));
    }
    Ok(())
}

fn validate_required_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let value = section.get(key).ok_or_else(|| ConfigError::Invalid {
        path: path.to_string(),
        reason: "value is required".to_string(),
    })?;
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid {
            path: path.to_string(),
            reason: "value cannot be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() || value.as_str().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "string"))
}

fn range_error<T: std::fmt::Display>(path: &str, min: T, max: T) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_string(),
        reason: format!("must be between {} and {}", min, max),
    }
}

fn config_type_error(path: &str, expected: &str) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_string(),
        reason: format!("expected {}", expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_empty_and_complete_configs() {
        validate_config(&json!({})).unwrap();
        validate_config(&json!({
            "server": { "host": "0.0.0.0", "port": 5000 },
            "openai": { "api_key": "sk-test", "temperature": 0.2, "max_tokens": 512 },
            "retrieval": { "top_k": 3, "min_similarity": 0.45 },
            "memory": { "max_turns": 10 },
            "data_source": {
                "path": "data/system_loss.db",
                "columns": [{ "name": "SystemLoss", "type": "float" }]
            }
        }))
        .unwrap();
    }

    #[test]
    fn rejects_out_of_range_similarity() {
        let config = json!({ "retrieval": { "min_similarity": 1.5 } });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("retrieval.min_similarity"));
    }

    #[test]
    fn rejects_zero_max_tokens() {
        let config = json!({ "openai": { "max_tokens": 0 } });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("openai.max_tokens"));
    }

    #[test]
    fn rejects_zero_turns() {
        let config = json!({ "memory": { "max_turns": 0 } });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("memory.max_turns"));
    }

    #[test]
    fn rejects_wrong_section_type() {
        let config = json!({ "openai": "sk-test" });
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("expected object"));
    }

    #[test]
    fn rejects_column_without_type() {
        let err = validate_config(&json!({
            "data_source": { "columns": [{ "name": "SystemLoss" }] }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("data_source.columns[0].type"));
    }
}
