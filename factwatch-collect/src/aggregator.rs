//! Fan-out to the registered claim sources and fold the results into one
//! [`AnalysisResult`].
use crate::filters::apply_cleaning;
use crate::mock::mock_result;
use chrono::{DateTime, Utc};
use factwatch_common::analysis::AnalysisConfig;
use factwatch_common::{
    count_categories, count_sources, AnalysisResult, Claim, Result, SentimentBreakdown, Source,
};
use factwatch_nlp::{
    analyze_sentiment, detect_alerts, detect_clusters, enhance_query, extract_entities,
    extract_key_terms, extract_regions, summarize_with_mode, DEFAULT_KEY_TERM_COUNT,
};
use factwatch_social::ClaimSource;
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use uuid::Uuid;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[derive(Default, Clone)]
pub struct Aggregator {
    sources: Vec<Arc<dyn ClaimSource>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn ClaimSource>) -> Self {
        self.register(source);
        self
    }

    pub fn register(&mut self, source: Arc<dyn ClaimSource>) {
        tracing::debug!(source = %source.source(), "collect.source.registered");
        self.sources.push(source);
    }

    pub fn registered(&self) -> Vec<Source> {
        self.sources.iter().map(|s| s.source()).collect()
    }

    /// Analyse `query` across `selected` sources. Never fails: mock mode,
    /// pipeline errors and panics all produce the mock result instead.
    pub async fn analyze(
        &self,
        query: &str,
        selected: &[Source],
        config: &AnalysisConfig,
    ) -> AnalysisResult {
        if config.collection.use_mock_data {
            tracing::info!(query, "collect.analyze.mock_mode");
            return mock_result(query, selected, Utc::now(), &mut rand::thread_rng());
        }

        match AssertUnwindSafe(self.try_analyze(query, selected, config))
            .catch_unwind()
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!(query, error = %e, "collect.analyze.fallback_to_mock");
                mock_result(query, selected, Utc::now(), &mut rand::thread_rng())
            }
            Err(payload) => {
                tracing::warn!(
                    query,
                    panic = panic_message(payload.as_ref()),
                    "collect.analyze.panicked_fallback_to_mock"
                );
                mock_result(query, selected, Utc::now(), &mut rand::thread_rng())
            }
        }
    }

    /// The live pipeline without the mock safety net.
    pub async fn try_analyze(
        &self,
        query: &str,
        selected: &[Source],
        config: &AnalysisConfig,
    ) -> Result<AnalysisResult> {
        config.validate()?;

        let expanded = enhance_query(query);
        for missing in selected
            .iter()
            .filter(|s| !self.sources.iter().any(|r| r.source() == **s))
        {
            tracing::debug!(source = %missing, "collect.source.not_registered");
        }

        let fetches = self
            .sources
            .iter()
            .filter(|s| selected.contains(&s.source()))
            .map(|s| {
                let source = s.source();
                let limit = config.collection.limits.for_source(source);
                let query = expanded.as_str();
                async move {
                    match AssertUnwindSafe(s.fetch(query, limit)).catch_unwind().await {
                        Ok(Ok(claims)) => {
                            tracing::debug!(%source, claims = claims.len(), "collect.fetch.ok");
                            claims
                        }
                        Ok(Err(e)) => {
                            tracing::warn!(%source, error = %e, "collect.fetch.failed");
                            Vec::new()
                        }
                        Err(payload) => {
                            tracing::warn!(
                                %source,
                                panic = panic_message(payload.as_ref()),
                                "collect.fetch.panicked"
                            );
                            Vec::new()
                        }
                    }
                }
            });

        let claims: Vec<Claim> = join_all(fetches).await.into_iter().flatten().collect();
        tracing::info!(query, fetched = claims.len(), "collect.fetch.done");

        Ok(build_result(claims, config, Utc::now()))
    }
}

/// Clean, enrich, sort and aggregate already-fetched claims.
pub fn build_result(claims: Vec<Claim>, config: &AnalysisConfig, now: DateTime<Utc>) -> AnalysisResult {
    let collection = &config.collection;
    let nlp = &config.nlp;

    let mut claims = apply_cleaning(claims, &collection.cleaning, &collection.allowed_languages);

    for claim in &mut claims {
        if nlp.features.enable_summary {
            claim.summary = summarize_with_mode(
                &claim.text,
                nlp.parameters.summary_length,
                nlp.models.summary_model,
            );
        }
        if nlp.features.enable_sentiment {
            claim.sentiment = analyze_sentiment(&claim.text);
        }
        if claim.id.is_empty() {
            claim.id = Uuid::new_v4().to_string();
        }
    }

    claims.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

    let result = AnalysisResult {
        total_posts: claims.len(),
        sources: count_sources(&claims),
        sentiment_breakdown: SentimentBreakdown::from_claims(&claims),
        source_categories: count_categories(&claims),
        key_terms: extract_key_terms(&claims, DEFAULT_KEY_TERM_COUNT),
        regions: extract_regions(&claims),
        entities: nlp.features.enable_ner.then(|| extract_entities(&claims)),
        clusters: nlp
            .features
            .enable_cluster_analysis
            .then(|| detect_clusters(&claims)),
        alerts: detect_alerts(&claims, now),
        claims,
    };
    tracing::info!(
        total = result.total_posts,
        key_terms = result.key_terms.len(),
        regions = result.regions.len(),
        "collect.analyze.done"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use factwatch_common::analysis::{NlpPatch, NlpFeatures};
    use factwatch_common::Sentiment;

    fn claim(text: &str, relevance: f64) -> Claim {
        Claim::new(Source::Twitter, text)
            .with_relevance(relevance)
            .with_sentiment(Sentiment::Positive)
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let claims = vec![
            claim("a", 0.5),
            claim("b", 0.9),
            claim("c", 0.5),
            claim("d", 0.7),
        ];
        let result = build_result(claims, &AnalysisConfig::default(), Utc::now());
        let order: Vec<&str> = result.claims.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
        assert_eq!(result.total_posts, 4);
    }

    #[test]
    fn enrichment_follows_feature_flags() {
        let mut empty_id = claim("Атака на місто. Оборона тримається. Все спокійно.", 0.5);
        empty_id.id.clear();

        let on = build_result(vec![empty_id.clone()], &AnalysisConfig::default(), Utc::now());
        assert_eq!(on.claims[0].sentiment, Sentiment::Neutral);
        assert!(!on.claims[0].id.is_empty());
        assert!(on.entities.is_some());
        assert!(on.clusters.is_some());

        let off_cfg = AnalysisConfig::default().with_nlp(NlpPatch {
            features: Some(NlpFeatures {
                enable_sentiment: false,
                enable_summary: false,
                enable_ner: false,
                enable_topic_modeling: false,
                enable_cluster_analysis: false,
            }),
            ..Default::default()
        });
        let off = build_result(vec![empty_id], &off_cfg, Utc::now());
        assert_eq!(off.claims[0].sentiment, Sentiment::Positive);
        assert_eq!(off.claims[0].summary, "");
        assert!(off.entities.is_none());
        assert!(off.clusters.is_none());
    }

    #[test]
    fn empty_input_yields_empty_aggregates() {
        let result = build_result(Vec::new(), &AnalysisConfig::default(), Utc::now());
        assert_eq!(result.total_posts, 0);
        assert!(result.sources.is_empty());
        assert!(result.key_terms.is_empty());
        assert!(result.alerts.is_empty());
    }
}
