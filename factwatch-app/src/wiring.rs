use anyhow::{Context, Result};
use factwatch_collect::Aggregator;
use factwatch_common::analysis::AnalysisConfig;
use factwatch_config::{ExtensionSettings, LlmService, ServicesConfig, SettingsStore};
use factwatch_llm::{FactChecker, LlmClient, OpenAiClient, PerplexityClient};
use factwatch_social::{TelegramSource, TwitterSource};
use std::sync::Arc;

/// Register a fetcher for every platform the services section can reach.
/// Telegram needs its proxy; without one it is left out.
pub fn build_aggregator(services: &ServicesConfig, analysis: &AnalysisConfig) -> Result<Aggregator> {
    let tw = &services.twitter;
    let twitter = TwitterSource::from_parts(
        analysis.collection.twitter_method,
        tw.bearer(),
        &tw.api_base,
        &tw.scrape_base,
        tw.proxy_url.as_deref().filter(|u| !u.trim().is_empty()),
    )
    .context("building twitter source")?;
    tracing::info!(method = ?twitter.method(), "wiring.twitter");

    let mut aggregator = Aggregator::new().with_source(Arc::new(twitter));

    match services.telegram.proxy() {
        Some(url) => {
            let telegram = TelegramSource::new(url, services.telegram.channels.clone())
                .context("building telegram source")?;
            tracing::info!(channels = telegram.channels().len(), "wiring.telegram");
            aggregator.register(Arc::new(telegram));
        }
        None => tracing::warn!("telegram proxy url not configured; telegram skipped"),
    }

    Ok(aggregator)
}

/// Stored credentials, with keys from the services section filling any that
/// were never saved.
pub fn load_settings(store: &dyn SettingsStore, services: &ServicesConfig) -> Result<ExtensionSettings> {
    let mut settings = ExtensionSettings::load(store).context("reading fact-check settings")?;
    let mut filled = false;
    if settings.openai_key.is_empty() {
        if let Some(key) = services.openai.key() {
            settings.openai_key = key.to_string();
            filled = true;
        }
    }
    if settings.perplexity_key.is_empty() {
        if let Some(key) = services.perplexity.key() {
            settings.perplexity_key = key.to_string();
            filled = true;
        }
    }
    // a demo flag forced only by missing keys is lifted once both are known
    if filled && !settings.openai_key.is_empty() && !settings.perplexity_key.is_empty() {
        settings.demo_mode = services.demo_mode || stored_demo_flag(store)?;
    } else {
        settings.demo_mode |= services.demo_mode;
    }
    Ok(settings)
}

fn stored_demo_flag(store: &dyn SettingsStore) -> Result<bool> {
    let mut defaults = serde_json::Map::new();
    defaults.insert(factwatch_config::store::DEMO_MODE.into(), false.into());
    let got = store.get(&defaults)?;
    Ok(got
        .get(factwatch_config::store::DEMO_MODE)
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false))
}

fn client<C, F>(key: &str, service: &LlmService, make: F) -> Result<Option<Arc<dyn LlmClient>>>
where
    C: LlmClient + 'static,
    F: FnOnce(&str, String, String) -> factwatch_common::Result<C>,
{
    if key.trim().is_empty() {
        return Ok(None);
    }
    let c = make(&service.endpoint, key.trim().to_string(), service.model.clone())?;
    Ok(Some(Arc::new(c)))
}

pub fn build_fact_checker(settings: &ExtensionSettings, services: &ServicesConfig) -> Result<FactChecker> {
    if settings.demo_mode {
        return Ok(FactChecker::demo());
    }
    let extractor = client(&settings.openai_key, &services.openai, OpenAiClient::with_base)
        .context("building openai client")?;
    let verifier = client(
        &settings.perplexity_key,
        &services.perplexity,
        PerplexityClient::with_base,
    )
    .context("building perplexity client")?;
    Ok(FactChecker::new(extractor, verifier, false))
}
