//! Loader for `factwatch.yaml` with environment overlays.
//!
//! Sources are merged in the order they are added; `FACTWATCH__`-prefixed
//! environment variables (double underscore as the nesting separator, e.g.
//! `FACTWATCH__SERVICES__TWITTER__BEARER_TOKEN`) are applied first and then
//! overridden by files. String values may reference `${VAR}` placeholders,
//! which are expanded after merging.
use config::{Config, ConfigError, Environment, File, FileFormat};
use factwatch_common::analysis::AnalysisConfig;
use factwatch_common::observability::{LogConfig, LogFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub mod store;

pub use store::{ExtensionSettings, JsonFileStore, MemoryStore, SettingsStore, StoreError};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const APP_DIR: &str = "factwatch";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FactwatchConfig {
    pub version: Option<String>,
    pub analysis: AnalysisConfig,
    pub services: ServicesConfig,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub twitter: TwitterService,
    pub telegram: TelegramService,
    pub openai: LlmService,
    #[serde(default = "LlmService::perplexity")]
    pub perplexity: LlmService,
    /// Answer fact checks with canned verdicts instead of calling providers.
    pub demo_mode: bool,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            twitter: TwitterService::default(),
            telegram: TelegramService::default(),
            openai: LlmService::default(),
            perplexity: LlmService::perplexity(),
            demo_mode: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwitterService {
    pub bearer_token: Option<String>,
    pub api_base: String,
    pub scrape_base: String,
    pub proxy_url: Option<String>,
}

impl Default for TwitterService {
    fn default() -> Self {
        Self {
            bearer_token: None,
            api_base: "https://api.twitter.com".into(),
            scrape_base: "https://twitter.com".into(),
            proxy_url: None,
        }
    }
}

impl TwitterService {
    pub fn bearer(&self) -> Option<&str> {
        resolved(&self.bearer_token)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramService {
    pub proxy_url: Option<String>,
    /// Channel handles to search; empty means the built-in list.
    pub channels: Vec<String>,
}

impl TelegramService {
    pub fn proxy(&self) -> Option<&str> {
        resolved(&self.proxy_url)
    }
}

/// One chat-completions provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmService {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for LlmService {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".into(),
            endpoint: "https://api.openai.com/v1".into(),
        }
    }
}

impl LlmService {
    fn perplexity() -> Self {
        Self {
            api_key: None,
            model: "sonar".into(),
            endpoint: "https://api.perplexity.ai".into(),
        }
    }

    pub fn key(&self) -> Option<&str> {
        resolved(&self.api_key)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub stderr: bool,
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            stderr: false,
            filter: "info".into(),
        }
    }
}

impl LoggingSection {
    pub fn to_log_config(&self, app_name: &str) -> LogConfig {
        LogConfig {
            app_name: app_name.to_string(),
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

/// Empty strings and placeholders left unexpanded count as "not configured".
fn resolved(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.contains("${"))
}

/// `~/.config/factwatch/factwatch.yaml` (platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("factwatch.yaml"))
}

/// `~/.config/factwatch/settings.json`, used by [`JsonFileStore`].
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("settings.json"))
}

/// Read a standalone analysis preset. Unknown keys and unknown enum values are
/// rejected rather than ignored.
///
/// ```
/// use factwatch_common::analysis::SummaryMode;
///
/// let cfg = factwatch_config::analysis_from_yaml_str(
///     "nlp:\n  models:\n    summary_model: abstractive\n",
/// )
/// .unwrap();
/// assert_eq!(cfg.nlp.models.summary_model, SummaryMode::Abstractive);
/// assert!(factwatch_config::analysis_from_yaml_str("nlp:\n  colour: red\n").is_err());
/// ```
pub fn analysis_from_yaml_str(yaml: &str) -> Result<AnalysisConfig, ConfigError> {
    if yaml.trim().is_empty() {
        return Ok(AnalysisConfig::default());
    }
    let mut v: Value =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Message(e.to_string()))?;
    if v.is_null() {
        return Ok(AnalysisConfig::default());
    }
    expand_env_in_value(&mut v);
    serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
}

pub fn analysis_from_file<P: AsRef<Path>>(path: P) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Message(format!("{}: {e}", path.display())))?;
    analysis_from_yaml_str(&raw)
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate (YAML files, inline YAML, env overrides).
pub struct FactwatchConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for FactwatchConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FactwatchConfigLoader {
    /// ```
    /// use factwatch_config::FactwatchConfigLoader;
    ///
    /// let cfg = FactwatchConfigLoader::new()
    ///     .with_yaml_str("version: '1'\nservices:\n  demo_mode: true\n")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("1"));
    /// assert!(cfg.services.demo_mode);
    /// assert_eq!(cfg.services.perplexity.model, "sonar");
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("FACTWATCH").separator("__"));
        Self { builder }
    }

    /// Attach a required file; format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for env-only deployments.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, then deserialize.
    ///
    /// The embedded analysis section is validated so a bad threshold fails here
    /// instead of silently degrading a later run.
    pub fn load(self) -> Result<FactwatchConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: FactwatchConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed
            .analysis
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        tracing::debug!(
            version = ?typed.version,
            twitter_method = ?typed.analysis.collection.twitter_method,
            demo_mode = typed.services.demo_mode,
            "config.loaded"
        );
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FW_TOKEN", Some("abc"), || {
            let mut v = json!("Bearer ${FW_TOKEN}");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("Bearer abc"));
        });
    }

    #[test]
    fn expands_nested_values_recursively() {
        temp_env::with_vars(
            [
                ("FW_HOST", Some("proxy.local")),
                ("FW_URL", Some("https://${FW_HOST}/api")),
            ],
            || {
                let mut v = json!({ "telegram": { "proxy_url": "${FW_URL}" }, "n": [1, "$FW_HOST"] });
                expand_env_in_value(&mut v);
                assert_eq!(
                    v,
                    json!({ "telegram": { "proxy_url": "https://proxy.local/api" }, "n": [1, "proxy.local"] })
                );
            },
        );
    }

    #[test]
    fn cyclic_references_terminate() {
        temp_env::with_vars([("FW_A", Some("${FW_B}")), ("FW_B", Some("${FW_A}"))], || {
            let mut v = json!("x=${FW_A}");
            expand_env_in_value(&mut v);
            assert!(v.as_str().unwrap().contains("${"));
        });
    }

    #[test]
    fn unexpanded_secrets_count_as_missing() {
        let svc = LlmService {
            api_key: Some("${OPENAI_API_KEY}".into()),
            ..Default::default()
        };
        assert_eq!(svc.key(), None);

        let svc = LlmService {
            api_key: Some("  sk-live  ".into()),
            ..Default::default()
        };
        assert_eq!(svc.key(), Some("sk-live"));
    }

    #[test]
    fn empty_preset_is_default() {
        assert_eq!(analysis_from_yaml_str("").unwrap(), AnalysisConfig::default());
    }
}
