use crate::source::ClaimSource;
use crate::twitter::client::TwitterApi;
use crate::twitter::extract::claims_from_search;
use crate::twitter::scrape::TwitterScraper;
use crate::twitter::types::ProxyResponse;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use factwatch_common::analysis::TwitterMethod;
use factwatch_common::{clamp_relevance, Claim, Source};
use factwatch_http::{HttpClient, RequestOpts};
use std::borrow::Cow;
use uuid::Uuid;

#[derive(Clone)]
enum Backend {
    /// `None` when no bearer token is configured; every fetch then fails.
    Api(Option<TwitterApi>),
    Scrape(TwitterScraper),
    Proxy(HttpClient),
}

/// Twitter/X claims through whichever [`TwitterMethod`] is configured.
#[derive(Clone)]
pub struct TwitterSource {
    backend: Backend,
}

impl TwitterSource {
    pub fn api(api: Option<TwitterApi>) -> Self {
        Self {
            backend: Backend::Api(api),
        }
    }

    pub fn scrape(scraper: TwitterScraper) -> Self {
        Self {
            backend: Backend::Scrape(scraper),
        }
    }

    /// Proxy answering `GET {proxy_url}?query=…` with `{"claims": [...]}`.
    pub fn proxy(proxy_url: &str) -> Result<Self> {
        let http = HttpClient::new(proxy_url).context("twitter proxy url")?;
        Ok(Self {
            backend: Backend::Proxy(http),
        })
    }

    /// Build the backend for `method`. The proxy method without a URL falls
    /// back to scraping.
    pub fn from_parts(
        method: TwitterMethod,
        bearer_token: Option<&str>,
        api_base: &str,
        scrape_base: &str,
        proxy_url: Option<&str>,
    ) -> Result<Self> {
        match (method, proxy_url) {
            (TwitterMethod::Api, _) => {
                let api = bearer_token
                    .map(|token| TwitterApi::with_base(api_base, token))
                    .transpose()?;
                Ok(Self::api(api))
            }
            (TwitterMethod::Proxy, Some(url)) => Self::proxy(url),
            (TwitterMethod::Proxy, None) => {
                tracing::warn!("twitter proxy method without proxy url; scraping instead");
                Ok(Self::scrape(TwitterScraper::new(scrape_base)?))
            }
            (TwitterMethod::Scrape, _) => Ok(Self::scrape(TwitterScraper::new(scrape_base)?)),
        }
    }

    pub fn method(&self) -> TwitterMethod {
        match self.backend {
            Backend::Api(_) => TwitterMethod::Api,
            Backend::Scrape(_) => TwitterMethod::Scrape,
            Backend::Proxy(_) => TwitterMethod::Proxy,
        }
    }

    async fn fetch_proxy(http: &HttpClient, query: &str) -> Result<Vec<Claim>> {
        let resp: ProxyResponse = http
            .get_json(
                "",
                RequestOpts {
                    query: Some(vec![("query", Cow::Borrowed(query))]),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .context("twitter proxy")?;

        Ok(resp
            .claims
            .into_iter()
            .map(|mut claim| {
                if claim.id.is_empty() {
                    claim.id = Uuid::new_v4().to_string();
                }
                claim.relevance_score = clamp_relevance(claim.relevance_score);
                claim
            })
            .collect())
    }
}

#[async_trait]
impl ClaimSource for TwitterSource {
    fn source(&self) -> Source {
        Source::Twitter
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Claim>> {
        let mut claims = match &self.backend {
            Backend::Api(None) => bail!("twitter api method needs a bearer token"),
            Backend::Api(Some(api)) => {
                let resp = api.recent_search(query, limit).await?;
                claims_from_search(resp, &mut rand::thread_rng())
            }
            Backend::Scrape(scraper) => scraper.search(query).await?,
            Backend::Proxy(http) => Self::fetch_proxy(http, query).await?,
        };
        claims.truncate(limit);
        tracing::debug!(method = ?self.method(), claims = claims.len(), "twitter.fetch.done");
        Ok(claims)
    }
}
