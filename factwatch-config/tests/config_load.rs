use factwatch_common::analysis::{SummaryMode, TwitterMethod};
use factwatch_common::observability::LogFormat;
use factwatch_config::FactwatchConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_with_env_placeholders() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
version: "1"
analysis:
  collection:
    twitter_method: api
    limits:
      twitter: 20
  nlp:
    models:
      summary_model: hybrid
    parameters:
      summary_length: 80
services:
  twitter:
    bearer_token: "${FW_TEST_BEARER}"
  openai:
    api_key: "${FW_TEST_OPENAI}"
logging:
  format: json
  stderr: true
"#;
    let p = write_yaml(&tmp, "factwatch.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("FW_TEST_BEARER", Some("bearer-from-env")),
            ("FW_TEST_OPENAI", None::<&str>),
        ],
        || {
            let cfg = FactwatchConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(cfg.analysis.collection.twitter_method, TwitterMethod::Api);
            assert_eq!(cfg.analysis.collection.limits.twitter, 20);
            assert_eq!(cfg.analysis.collection.limits.telegram, 100);
            assert_eq!(cfg.analysis.nlp.models.summary_model, SummaryMode::Hybrid);
            assert_eq!(cfg.analysis.nlp.parameters.summary_length, 80);
            assert_eq!(cfg.services.twitter.bearer(), Some("bearer-from-env"));
            assert_eq!(cfg.services.openai.key(), None);
            assert_eq!(cfg.logging.format, LogFormat::Json);
            assert!(cfg.logging.stderr);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let cfg = FactwatchConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");
    assert_eq!(cfg.analysis.collection.twitter_method, TwitterMethod::Scrape);
    assert_eq!(cfg.services.openai.model, "gpt-3.5-turbo");
    assert!(cfg.services.twitter.bearer().is_none());
}

#[test]
#[serial]
fn invalid_analysis_section_is_rejected() {
    let err = FactwatchConfigLoader::new()
        .with_yaml_str("analysis:\n  nlp:\n    parameters:\n      summary_length: 0\n")
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("summary_length"));
}

#[test]
#[serial]
fn unknown_enum_value_is_rejected() {
    let result = FactwatchConfigLoader::new()
        .with_yaml_str("analysis:\n  collection:\n    twitter_method: carrier_pigeon\n")
        .load();
    assert!(result.is_err());
}
