//! Key/value settings persistence for the fact-check credentials.
//!
//! Reads take a map of keys to defaults and return the stored value for every
//! requested key, falling back to the default when nothing is stored.
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const OPENAI_KEY: &str = "openaiKey";
pub const PERPLEXITY_KEY: &str = "perplexityKey";
pub const DEMO_MODE: &str = "demoMode";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is not a JSON object: {message}")]
    Format { path: PathBuf, message: String },
}

pub trait SettingsStore {
    fn get(&self, defaults: &Map<String, Value>) -> Result<Map<String, Value>, StoreError>;
    fn set(&mut self, values: Map<String, Value>) -> Result<(), StoreError>;
}

fn overlay(defaults: &Map<String, Value>, stored: &Map<String, Value>) -> Map<String, Value> {
    defaults
        .iter()
        .map(|(k, default)| (k.clone(), stored.get(k).unwrap_or(default).clone()))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Map<String, Value>,
}

impl SettingsStore for MemoryStore {
    fn get(&self, defaults: &Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
        Ok(overlay(defaults, &self.values))
    }

    fn set(&mut self, values: Map<String, Value>) -> Result<(), StoreError> {
        self.values.extend(values);
        Ok(())
    }
}

/// Settings persisted as one pretty-printed JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StoreError::Format {
                path: self.path.clone(),
                message: format!("found {other}"),
            }),
            Err(e) => Err(StoreError::Format {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, defaults: &Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
        Ok(overlay(defaults, &self.read_all()?))
    }

    fn set(&mut self, values: Map<String, Value>) -> Result<(), StoreError> {
        let mut all = self.read_all()?;
        all.extend(values);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(all)).map_err(|e| {
            StoreError::Format {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        std::fs::write(&self.path, body).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Credentials and mode for the fact-check flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSettings {
    pub openai_key: String,
    pub perplexity_key: String,
    pub demo_mode: bool,
}

impl ExtensionSettings {
    /// Load from a store. Demo mode is forced on while either key is missing.
    ///
    /// ```
    /// use factwatch_config::{ExtensionSettings, MemoryStore, SettingsStore};
    /// use serde_json::{json, Map};
    ///
    /// let mut store = MemoryStore::default();
    /// let mut values = Map::new();
    /// values.insert("openaiKey".into(), json!("sk-1"));
    /// store.set(values).unwrap();
    ///
    /// let settings = ExtensionSettings::load(&store).unwrap();
    /// assert_eq!(settings.openai_key, "sk-1");
    /// assert!(settings.demo_mode);
    /// ```
    pub fn load(store: &dyn SettingsStore) -> Result<Self, StoreError> {
        let mut defaults = Map::new();
        defaults.insert(OPENAI_KEY.into(), Value::String(String::new()));
        defaults.insert(PERPLEXITY_KEY.into(), Value::String(String::new()));
        defaults.insert(DEMO_MODE.into(), Value::Bool(false));

        let got = store.get(&defaults)?;
        let text = |key: &str| {
            got.get(key)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let openai_key = text(OPENAI_KEY);
        let perplexity_key = text(PERPLEXITY_KEY);
        let stored_demo = got.get(DEMO_MODE).and_then(Value::as_bool).unwrap_or(false);
        let keys_missing = openai_key.is_empty() || perplexity_key.is_empty();
        if keys_missing && !stored_demo {
            tracing::info!("fact-check keys incomplete; demo mode enabled");
        }

        Ok(Self {
            openai_key,
            perplexity_key,
            demo_mode: stored_demo || keys_missing,
        })
    }

    /// Persist the settings. Saving with both keys present clears demo mode.
    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<(), StoreError> {
        let both_keys = !self.openai_key.trim().is_empty() && !self.perplexity_key.trim().is_empty();
        let mut values = Map::new();
        values.insert(OPENAI_KEY.into(), Value::String(self.openai_key.clone()));
        values.insert(PERPLEXITY_KEY.into(), Value::String(self.perplexity_key.clone()));
        values.insert(DEMO_MODE.into(), Value::Bool(self.demo_mode && !both_keys));
        store.set(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_fill_missing_keys() {
        let store = MemoryStore::default();
        let mut defaults = Map::new();
        defaults.insert("demoMode".into(), json!(true));
        let got = store.get(&defaults).unwrap();
        assert_eq!(got["demoMode"], json!(true));
    }

    #[test]
    fn both_keys_allow_live_mode() {
        let mut store = MemoryStore::default();
        ExtensionSettings {
            openai_key: "sk-a".into(),
            perplexity_key: "pplx-b".into(),
            demo_mode: false,
        }
        .save(&mut store)
        .unwrap();

        let loaded = ExtensionSettings::load(&store).unwrap();
        assert!(!loaded.demo_mode);
        assert_eq!(loaded.perplexity_key, "pplx-b");
    }

    #[test]
    fn keys_saved_one_at_a_time_leave_demo_mode() {
        let mut store = MemoryStore::default();

        let mut settings = ExtensionSettings::load(&store).unwrap();
        settings.openai_key = "sk-1".into();
        settings.save(&mut store).unwrap();

        let mut settings = ExtensionSettings::load(&store).unwrap();
        assert!(settings.demo_mode);
        settings.perplexity_key = "pplx-1".into();
        settings.save(&mut store).unwrap();

        let loaded = ExtensionSettings::load(&store).unwrap();
        assert_eq!(loaded.openai_key, "sk-1");
        assert_eq!(loaded.perplexity_key, "pplx-1");
        assert!(!loaded.demo_mode);
    }

    #[test]
    fn json_file_round_trip_and_merge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut store = JsonFileStore::new(&path);

        assert_eq!(ExtensionSettings::load(&store).unwrap(), ExtensionSettings {
            demo_mode: true,
            ..Default::default()
        });

        let mut first = Map::new();
        first.insert(OPENAI_KEY.into(), json!("sk-a"));
        store.set(first).unwrap();
        let mut second = Map::new();
        second.insert(PERPLEXITY_KEY.into(), json!("pplx-b"));
        store.set(second).unwrap();

        let loaded = ExtensionSettings::load(&store).unwrap();
        assert_eq!(loaded.openai_key, "sk-a");
        assert_eq!(loaded.perplexity_key, "pplx-b");
        assert!(!loaded.demo_mode);
    }

    #[test]
    fn non_object_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            ExtensionSettings::load(&store),
            Err(StoreError::Format { .. })
        ));
    }
}
