//! Wrapper around `GET 2/tweets/search/recent`.
//!
//! Shapes the query for Ukrainian/Russian originals, requests the author and
//! place expansions the claim mapper needs, and always asks for a window the
//! endpoint accepts (inside the last seven days, ending safely before "now").
use crate::twitter::types::SearchResponse;
use anyhow::{Context, Result};
use factwatch_http::{Auth, HttpClient, RequestOpts};
use std::borrow::Cow;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    bearer: String,
}

impl TwitterApi {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self> {
        Self::with_base(DEFAULT_API_BASE, bearer_token)
    }

    pub fn with_base(base: &str, bearer_token: impl Into<String>) -> Result<Self> {
        let http = HttpClient::new(base).context("twitter api base url")?;
        Ok(Self {
            http,
            bearer: bearer_token.into(),
        })
    }

    /// `"{query} lang:uk OR lang:ru -is:retweet"`
    pub fn search_query(query: &str) -> String {
        format!("{query} lang:uk OR lang:ru -is:retweet")
    }

    pub async fn recent_search(&self, query: &str, max_results: usize) -> Result<SearchResponse> {
        let max_results = max_results.clamp(10, 100);

        let now = OffsetDateTime::now_utc();
        let end = now - Duration::seconds(20);
        let start = now - Duration::days(7) + Duration::minutes(1);

        let params: Vec<(&str, Cow<'_, str>)> = vec![
            ("query", Self::search_query(query).into()),
            ("max_results", max_results.to_string().into()),
            ("tweet.fields", "created_at,public_metrics,lang,geo".into()),
            (
                "user.fields",
                "name,username,verified,public_metrics,description".into(),
            ),
            ("expansions", "author_id,geo.place_id".into()),
            ("start_time", start.format(&Rfc3339)?.into()),
            ("end_time", end.format(&Rfc3339)?.into()),
        ];

        let resp: SearchResponse = self
            .http
            .get_json(
                "2/tweets/search/recent",
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.bearer)),
                    query: Some(params),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .context("twitter recent search")?;

        tracing::debug!(
            tweets = resp.data.as_ref().map_or(0, Vec::len),
            next_token = ?resp.meta.as_ref().and_then(|m| m.next_token.as_deref()),
            "twitter.search.response"
        );
        Ok(resp)
    }
}
