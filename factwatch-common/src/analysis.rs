//! Closed, versioned configuration schema for one analysis run.
//!
//! Every knob the dashboard can flip is an explicit field with an enumerated
//! set of legal values. Callers never mutate a shared instance: the `with_*`
//! functions return an updated copy that is then passed to the aggregator.
use crate::model::Source;
use crate::{FactwatchError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    #[default]
    #[serde(rename = "1")]
    V1,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub version: SchemaVersion,
    pub collection: CollectionConfig,
    pub nlp: NlpConfig,
}

impl AnalysisConfig {
    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.nlp.parameters.summary_length == 0 {
            return Err(FactwatchError::Config(
                "nlp.parameters.summary_length must be positive".into(),
            ));
        }
        for (name, pct) in [
            ("sentiment_threshold", self.nlp.parameters.sentiment_threshold),
            ("entity_confidence", self.nlp.parameters.entity_confidence),
            ("clustering_threshold", self.nlp.parameters.clustering_threshold),
        ] {
            if pct > 100 {
                return Err(FactwatchError::Config(format!(
                    "nlp.parameters.{name} must be within 0..=100, got {pct}"
                )));
            }
        }
        if self.collection.cleaning.filter_languages && self.collection.allowed_languages.is_empty()
        {
            return Err(FactwatchError::Config(
                "collection.allowed_languages is empty while language filtering is on".into(),
            ));
        }
        if let Some(bad) = self
            .collection
            .allowed_languages
            .iter()
            .find(|l| l.len() != 2 || !l.chars().all(|c| c.is_ascii_lowercase()))
        {
            return Err(FactwatchError::Config(format!(
                "collection.allowed_languages entry {bad:?} is not a two-letter code"
            )));
        }
        Ok(())
    }

    /// Shallow-merge a collection patch, returning the updated configuration.
    ///
    /// ```
    /// use factwatch_common::analysis::{AnalysisConfig, CollectionPatch};
    ///
    /// let base = AnalysisConfig::default();
    /// let next = base.with_collection(CollectionPatch {
    ///     allowed_languages: Some(vec!["uk".into()]),
    ///     ..Default::default()
    /// });
    /// assert_eq!(next.collection.allowed_languages, vec!["uk".to_string()]);
    /// assert_eq!(base.collection.allowed_languages.len(), 3);
    /// ```
    pub fn with_collection(&self, patch: CollectionPatch) -> Self {
        let mut next = self.clone();
        let c = &mut next.collection;
        if let Some(v) = patch.sources {
            c.sources = v;
        }
        if let Some(v) = patch.limits {
            c.limits = v;
        }
        if let Some(v) = patch.cleaning {
            c.cleaning = v;
        }
        if let Some(v) = patch.allowed_languages {
            c.allowed_languages = v;
        }
        if let Some(v) = patch.target_language {
            c.target_language = v;
        }
        if let Some(v) = patch.twitter_method {
            c.twitter_method = v;
        }
        if let Some(v) = patch.use_mock_data {
            c.use_mock_data = v;
        }
        next
    }

    /// Shallow-merge an NLP patch, returning the updated configuration.
    pub fn with_nlp(&self, patch: NlpPatch) -> Self {
        let mut next = self.clone();
        if let Some(v) = patch.models {
            next.nlp.models = v;
        }
        if let Some(v) = patch.parameters {
            next.nlp.parameters = v;
        }
        if let Some(v) = patch.features {
            next.nlp.features = v;
        }
        next
    }
}

/// Partial update for [`CollectionConfig`]; `None` keeps the current section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionPatch {
    pub sources: Option<SourceToggles>,
    pub limits: Option<SourceLimits>,
    pub cleaning: Option<CleaningConfig>,
    pub allowed_languages: Option<Vec<String>>,
    pub target_language: Option<String>,
    pub twitter_method: Option<TwitterMethod>,
    pub use_mock_data: Option<bool>,
}

/// Partial update for [`NlpConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpPatch {
    pub models: Option<NlpModels>,
    pub parameters: Option<NlpParameters>,
    pub features: Option<NlpFeatures>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    pub sources: SourceToggles,
    pub limits: SourceLimits,
    pub cleaning: CleaningConfig,
    pub allowed_languages: Vec<String>,
    pub target_language: String,
    pub twitter_method: TwitterMethod,
    /// Skip live fetching and answer from the fixed mock claim set.
    pub use_mock_data: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            sources: SourceToggles::default(),
            limits: SourceLimits::default(),
            cleaning: CleaningConfig::default(),
            allowed_languages: vec!["uk".into(), "ru".into(), "en".into()],
            target_language: "en".into(),
            twitter_method: TwitterMethod::default(),
            use_mock_data: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceToggles {
    pub twitter: bool,
    pub telegram: bool,
    pub reddit: bool,
    pub facebook: bool,
    pub web: bool,
}

impl Default for SourceToggles {
    fn default() -> Self {
        Self {
            twitter: true,
            telegram: true,
            reddit: false,
            facebook: false,
            web: false,
        }
    }
}

impl SourceToggles {
    pub fn is_enabled(&self, source: Source) -> bool {
        match source {
            Source::Twitter => self.twitter,
            Source::Telegram => self.telegram,
            Source::Reddit => self.reddit,
            Source::Facebook => self.facebook,
            Source::Web => self.web,
        }
    }

    pub fn enabled(&self) -> Vec<Source> {
        Source::ALL
            .into_iter()
            .filter(|s| self.is_enabled(*s))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceLimits {
    pub twitter: usize,
    pub telegram: usize,
    pub reddit: usize,
    pub facebook: usize,
    pub web: usize,
}

impl Default for SourceLimits {
    fn default() -> Self {
        Self {
            twitter: 100,
            telegram: 100,
            reddit: 50,
            facebook: 50,
            web: 30,
        }
    }
}

impl SourceLimits {
    pub fn for_source(&self, source: Source) -> usize {
        match source {
            Source::Twitter => self.twitter,
            Source::Telegram => self.telegram,
            Source::Reddit => self.reddit,
            Source::Facebook => self.facebook,
            Source::Web => self.web,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleaningConfig {
    pub remove_bots: bool,
    pub remove_ads: bool,
    pub filter_languages: bool,
    /// Accepted for schema compatibility; translation is not performed.
    pub enable_translation: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            remove_bots: true,
            remove_ads: true,
            filter_languages: true,
            enable_translation: false,
        }
    }
}

/// How the Twitter fetcher obtains posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwitterMethod {
    Api,
    #[default]
    Scrape,
    Proxy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NlpConfig {
    pub models: NlpModels,
    pub parameters: NlpParameters,
    pub features: NlpFeatures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NlpModels {
    pub sentiment_model: SentimentModel,
    pub summary_model: SummaryMode,
    pub entity_model: EntityModel,
    pub clustering_algorithm: ClusteringAlgorithm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentModel {
    Lexicon,
    #[default]
    Transformers,
    Gpt,
}

/// Summarization style applied to each claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    #[default]
    Extractive,
    Abstractive,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityModel {
    #[default]
    Spacy,
    Flair,
    Transformers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusteringAlgorithm {
    #[default]
    Kmeans,
    Dbscan,
    Hierarchical,
    Lda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NlpParameters {
    pub sentiment_threshold: u8,
    /// Target summary length in characters.
    pub summary_length: usize,
    pub entity_confidence: u8,
    pub clustering_threshold: u8,
}

impl Default for NlpParameters {
    fn default() -> Self {
        Self {
            sentiment_threshold: 70,
            summary_length: 150,
            entity_confidence: 60,
            clustering_threshold: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NlpFeatures {
    pub enable_sentiment: bool,
    pub enable_summary: bool,
    pub enable_ner: bool,
    pub enable_topic_modeling: bool,
    pub enable_cluster_analysis: bool,
}

impl Default for NlpFeatures {
    fn default() -> Self {
        Self {
            enable_sentiment: true,
            enable_summary: true,
            enable_ner: true,
            enable_topic_modeling: true,
            enable_cluster_analysis: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        AnalysisConfig::default().validate().unwrap();
        assert_eq!(
            SourceToggles::default().enabled(),
            vec![Source::Twitter, Source::Telegram]
        );
    }

    #[test]
    fn zero_summary_length_is_rejected() {
        let cfg = AnalysisConfig::default().with_nlp(NlpPatch {
            parameters: Some(NlpParameters {
                summary_length: 0,
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(matches!(cfg.validate(), Err(FactwatchError::Config(_))));
    }

    #[test]
    fn malformed_language_code_is_rejected() {
        let cfg = AnalysisConfig::default().with_collection(CollectionPatch {
            allowed_languages: Some(vec!["ukrainian".into()]),
            ..Default::default()
        });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_enum_values_fail_to_parse() {
        let raw = r#"{"nlp":{"models":{"summary_model":"generative"}}}"#;
        assert!(serde_json::from_str::<AnalysisConfig>(raw).is_err());

        let raw = r#"{"nlp":{"models":{"summary_model":"hybrid"}}}"#;
        let cfg: AnalysisConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.nlp.models.summary_model, SummaryMode::Hybrid);
        assert_eq!(cfg.nlp.parameters.summary_length, 150);
    }

    #[test]
    fn patches_leave_the_original_untouched() {
        let base = AnalysisConfig::default();
        let next = base.with_collection(CollectionPatch {
            use_mock_data: Some(true),
            twitter_method: Some(TwitterMethod::Api),
            ..Default::default()
        });
        assert!(!base.collection.use_mock_data);
        assert!(next.collection.use_mock_data);
        assert_eq!(next.collection.twitter_method, TwitterMethod::Api);
        assert_eq!(next.collection.limits, base.collection.limits);
    }
}
