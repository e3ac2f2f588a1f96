use async_trait::async_trait;
use factwatch_collect::Aggregator;
use factwatch_common::analysis::{AnalysisConfig, CollectionPatch, NlpParameters, NlpPatch};
use factwatch_common::{Claim, Source, SourceCategory};
use factwatch_social::ClaimSource;
use std::sync::{Arc, Mutex};

enum Behaviour {
    Claims(Vec<Claim>),
    Fail,
    Panic,
}

struct FakeSource {
    source: Source,
    behaviour: Behaviour,
    seen: Mutex<Vec<(String, usize)>>,
}

impl FakeSource {
    fn new(source: Source, behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            source,
            behaviour,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, usize)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClaimSource for FakeSource {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(&self, query: &str, limit: usize) -> anyhow::Result<Vec<Claim>> {
        self.seen.lock().unwrap().push((query.to_string(), limit));
        match &self.behaviour {
            Behaviour::Claims(c) => Ok(c.clone()),
            Behaviour::Fail => anyhow::bail!("upstream returned 503"),
            Behaviour::Panic => panic!("fetcher bug"),
        }
    }
}

fn live_config() -> AnalysisConfig {
    AnalysisConfig::default().with_collection(CollectionPatch {
        use_mock_data: Some(false),
        ..Default::default()
    })
}

fn post(source: Source, user: &str, text: &str, relevance: f64) -> Claim {
    Claim::new(source, text)
        .with_username(user)
        .with_relevance(relevance)
        .with_category(SourceCategory::LocalSource)
}

fn assert_sorted(claims: &[Claim]) {
    let scores: Vec<f64> = claims.iter().map(|c| c.relevance_score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "not sorted: {scores:?}");
}

fn is_mock(claims: &[Claim]) -> bool {
    claims
        .iter()
        .any(|c| c.username.as_deref() == Some("UkrInform") || c.username.as_deref() == Some("Emergency_Channel"))
}

#[tokio::test]
async fn merges_sources_sorted_by_relevance() {
    let twitter = FakeSource::new(
        Source::Twitter,
        Behaviour::Claims(vec![
            post(Source::Twitter, "a", "Обстріл Харків вночі", 0.4),
            post(Source::Twitter, "b", "Евакуація триває", 0.9),
        ]),
    );
    let telegram = FakeSource::new(
        Source::Telegram,
        Behaviour::Claims(vec![post(Source::Telegram, "c", "Оборона тримається", 0.7)]),
    );
    let agg = Aggregator::new()
        .with_source(twitter.clone())
        .with_source(telegram.clone());

    let result = agg
        .analyze("обстріли", &[Source::Twitter, Source::Telegram], &live_config())
        .await;

    let users: Vec<_> = result.claims.iter().filter_map(|c| c.username.as_deref()).collect();
    assert_eq!(users, vec!["b", "c", "a"]);
    assert_eq!(result.total_posts, 3);
    assert_eq!(result.sources.get(&Source::Twitter), Some(&2));
    assert_eq!(result.sources.get(&Source::Telegram), Some(&1));
    assert_eq!(result.source_categories.get(&SourceCategory::LocalSource), Some(&3));
    assert_eq!(result.regions.get("Kharkiv"), Some(&1));

    let (query, limit) = twitter.calls().remove(0);
    assert!(query.starts_with("обстріли OR "));
    assert_eq!(limit, 100);
}

#[tokio::test]
async fn failing_and_panicking_sources_contribute_nothing() {
    let ok = FakeSource::new(
        Source::Telegram,
        Behaviour::Claims(vec![post(Source::Telegram, "ok", "Все спокійно", 0.5)]),
    );
    let failing = FakeSource::new(Source::Twitter, Behaviour::Fail);
    let panicking = FakeSource::new(Source::Twitter, Behaviour::Panic);
    let agg = Aggregator::new()
        .with_source(failing)
        .with_source(panicking)
        .with_source(ok);

    let result = agg
        .analyze("спокій", &[Source::Twitter, Source::Telegram], &live_config())
        .await;

    assert_eq!(result.total_posts, 1);
    assert_eq!(result.claims[0].username.as_deref(), Some("ok"));
    assert!(!is_mock(&result.claims));
}

#[tokio::test]
async fn unselected_sources_are_not_called() {
    let twitter = FakeSource::new(Source::Twitter, Behaviour::Claims(Vec::new()));
    let telegram = FakeSource::new(
        Source::Telegram,
        Behaviour::Claims(vec![post(Source::Telegram, "t", "текст", 0.5)]),
    );
    let agg = Aggregator::new()
        .with_source(twitter.clone())
        .with_source(telegram.clone());

    let result = agg.analyze("x", &[Source::Telegram], &live_config()).await;
    assert!(twitter.calls().is_empty());
    assert_eq!(telegram.calls().len(), 1);
    assert_eq!(result.total_posts, 1);
}

#[tokio::test]
async fn cleaning_runs_before_aggregation() {
    let twitter = FakeSource::new(
        Source::Twitter,
        Behaviour::Claims(vec![
            post(Source::Twitter, "spam_bot_7", "Новини дня", 0.9),
            post(Source::Twitter, "shop", "Купити генератор зі знижкою", 0.8),
            post(Source::Twitter, "de", "Guten Tag", 0.7).with_language("de"),
            post(Source::Twitter, "keep", "Ситуація стабільна", 0.6).with_language("uk"),
        ]),
    );
    let agg = Aggregator::new().with_source(twitter);

    let result = agg.analyze("x", &[Source::Twitter], &live_config()).await;
    assert_eq!(result.total_posts, 1);
    assert_eq!(result.claims[0].username.as_deref(), Some("keep"));
}

#[tokio::test]
async fn invalid_config_degrades_to_mock() {
    let twitter = FakeSource::new(
        Source::Twitter,
        Behaviour::Claims(vec![post(Source::Twitter, "live", "текст", 0.5)]),
    );
    let agg = Aggregator::new().with_source(twitter.clone());
    let broken = live_config().with_nlp(NlpPatch {
        parameters: Some(NlpParameters {
            summary_length: 0,
            ..Default::default()
        }),
        ..Default::default()
    });

    assert!(agg.try_analyze("x", &[Source::Twitter], &broken).await.is_err());

    let result = agg
        .analyze("drones", &[Source::Twitter, Source::Telegram], &broken)
        .await;
    assert!(twitter.calls().is_empty());
    assert!(is_mock(&result.claims));
    assert_eq!(result.total_posts, 9);
    assert_eq!(result.key_terms.last().map(String::as_str), Some("drones"));
    assert_sorted(&result.claims);
}

#[tokio::test]
async fn mock_mode_skips_fetching() {
    let twitter = FakeSource::new(Source::Twitter, Behaviour::Panic);
    let agg = Aggregator::new().with_source(twitter.clone());
    let mock_cfg = AnalysisConfig::default().with_collection(CollectionPatch {
        use_mock_data: Some(true),
        ..Default::default()
    });

    let result = agg.analyze("drones", &[Source::Twitter], &mock_cfg).await;
    assert!(twitter.calls().is_empty());
    assert_eq!(result.total_posts, 4);
    assert!(result.claims.iter().all(|c| c.source == Source::Twitter));
    assert_sorted(&result.claims);

    let both = agg
        .analyze("drones", &[Source::Twitter, Source::Telegram], &mock_cfg)
        .await;
    assert_eq!(both.total_posts, 9);
    assert_sorted(&both.claims);
    assert_eq!(both.claims[0].username.as_deref(), Some("Evacuation_Donetsk"));
}
