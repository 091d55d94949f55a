use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::paths::AppPaths;
use super::settings::Settings;
use super::validation::validate_config;
use super::ConfigError;

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 8] = [
    "api_key",
    "secret",
    "password",
    "_token",
    "token_",
    "credential",
    "access_key",
    "bearer",
];

const SENSITIVE_WHITELIST: [&str; 2] = ["max_tokens", "tokens"];

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("C3_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = self.paths.user_data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        self.paths.project_root.join("config.yml")
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.paths.secrets_path.clone()
    }

    /// Public config deep-merged with the secrets file.
    pub fn load_config(&self) -> Result<Value, ConfigError> {
        let public_config = load_yaml_file(&self.config_path())?;
        let secrets_config = load_yaml_file(&self.secrets_path())?;
        Ok(deep_merge(&public_config, &secrets_config))
    }

    /// Loads, applies environment overrides, validates and types the config.
    pub fn load_settings(&self) -> Result<Settings, ConfigError> {
        let mut config = self.load_config()?;
        apply_env_overrides(&mut config);
        settings_from_value(config)
    }

    pub fn redact_sensitive_values(&self, value: &Value) -> Value {
        redact_sensitive_values(value)
    }
}

/// Validates a merged config value and checks the keys the assistant cannot run without.
pub fn settings_from_value(config: Value) -> Result<Settings, ConfigError> {
    validate_config(&config)?;

    let settings: Settings = serde_json::from_value(config).map_err(|e| ConfigError::Invalid {
        path: "root".to_string(),
        reason: e.to_string(),
    })?;

    let has_api_key = settings
        .openai
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    if !has_api_key {
        return Err(ConfigError::Missing("openai.api_key"));
    }
    if settings.data_source.path.is_none() {
        return Err(ConfigError::Missing("data_source.path"));
    }

    Ok(settings)
}

fn apply_env_overrides(config: &mut Value) {
    if !config.is_object() {
        return;
    }

    if let Ok(key) = env::var("OPENAI_API_KEY") {
        if !key.trim().is_empty() {
            set_path(config, &["openai", "api_key"], Value::String(key));
        }
    }

    if let Some(port) = env::var("PORT").ok().and_then(|v| v.parse::<u16>().ok()) {
        set_path(config, &["server", "port"], Value::from(port));
    }
}

fn set_path(config: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut cursor = config;
    for key in parents {
        let Some(map) = cursor.as_object_mut() else {
            return;
        };
        let entry = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        cursor = entry;
    }

    if let Some(map) = cursor.as_object_mut() {
        map.insert(last.to_string(), value);
    }
}

fn load_yaml_file(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_yaml::from_str::<Value>(&contents) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(Value::Null) => Ok(Value::Object(Map::new())),
        Ok(_) => Err(ConfigError::Parse {
            path: path.to_path_buf(),
            message: "top level must be a mapping".to_string(),
        }),
        Err(e) => Err(ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}

fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) && !val.is_null() {
                    redacted.insert(key.clone(), Value::String(REDACT_PLACEHOLDER.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_values(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_values).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    if SENSITIVE_WHITELIST
        .iter()
        .any(|allowed| *allowed == key_lower)
    {
        return false;
    }
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| key_lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deep_merge_merges_objects_and_overrides_scalars() {
        let base = json!({
            "openai": { "chat_model": "gpt-3.5-turbo", "request_timeout_secs": 60 },
            "memory": { "max_turns": 10 }
        });
        let secrets = json!({
            "openai": { "api_key": "sk-live" },
            "memory": { "max_turns": 4 }
        });

        let merged = deep_merge(&base, &secrets);

        assert_eq!(
            merged,
            json!({
                "openai": {
                    "chat_model": "gpt-3.5-turbo",
                    "request_timeout_secs": 60,
                    "api_key": "sk-live"
                },
                "memory": { "max_turns": 4 }
            })
        );
    }

    #[test]
    fn redact_sensitive_values_replaces_secrets_only() {
        let input = json!({
            "openai": { "api_key": "sk-live", "chat_model": "gpt-3.5-turbo" },
            "data_source": { "password": "pw", "table": "SystemLoss" }
        });

        let redacted = redact_sensitive_values(&input);

        assert_eq!(
            redacted,
            json!({
                "openai": { "api_key": "****", "chat_model": "gpt-3.5-turbo" },
                "data_source": { "password": "****", "table": "SystemLoss" }
            })
        );
    }

    #[test]
    fn set_path_creates_missing_sections() {
        let mut config = json!({ "memory": { "max_turns": 3 } });
        set_path(&mut config, &["openai", "api_key"], json!("sk-env"));
        assert_eq!(config["openai"]["api_key"], "sk-env");
        assert_eq!(config["memory"]["max_turns"], 3);
    }

    #[test]
    fn settings_require_api_key_and_data_source() {
        let config = json!({ "data_source": { "path": "loss.db" } });
        let err = settings_from_value(config).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("openai.api_key")));

        let config = json!({ "openai": { "api_key": "sk" } });
        let err = settings_from_value(config).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("data_source.path")));

        let settings = settings_from_value(json!({
            "openai": { "api_key": "sk" },
            "data_source": { "path": "loss.db" }
        }))
        .unwrap();
        assert_eq!(settings.openai.api_key.as_deref(), Some("sk"));
    }

    #[test]
    fn load_config_merges_files_from_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yml"),
            "openai:\n  chat_model: gpt-4o-mini\ndata_source:\n  path: loss.db\n",
        )
        .unwrap();
        let secrets = "openai:\n  api_key: sk-file\n";
        fs::write(dir.path().join("secrets.yaml"), secrets).unwrap();

        let service = ConfigService::new(Arc::new(AppPaths::with_root(dir.path())));
        let config = service.load_config().unwrap();
        let settings = settings_from_value(config).unwrap();

        assert_eq!(settings.openai.chat_model, "gpt-4o-mini");
        assert_eq!(settings.openai.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yml"), "openai: [unclosed\n").unwrap();

        let service = ConfigService::new(Arc::new(AppPaths::with_root(dir.path())));
        let err = service.load_config().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
