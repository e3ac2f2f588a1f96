//! Scraping the public search page. Regex extraction only: tweet bodies,
//! `@handles` and `datetime` stamps are paired by position.
use crate::classify::{scrape_relevance, SCRAPE_NEGATIVE, SCRAPE_POSITIVE};
use crate::source::preview;
use anyhow::{Context, Result};
use factwatch_common::{Claim, Source, SourceCategory};
use factwatch_http::header::{HeaderMap, HeaderValue, USER_AGENT};
use factwatch_http::{HttpClient, RequestOpts};
use factwatch_nlp::{detect_language, first_region_mention, lexicon_sentiment};
use rand::Rng;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

pub const DEFAULT_SCRAPE_BASE: &str = "https://twitter.com";
const CRAWLER_UA: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
const PREVIEW_CHARS: usize = 120;

struct Patterns {
    tweet: Regex,
    user: Regex,
    handle: Regex,
    time: Regex,
    tag: Regex,
    spaces: Regex,
}

fn patterns() -> &'static Patterns {
    static P: OnceLock<Patterns> = OnceLock::new();
    P.get_or_init(|| Patterns {
        tweet: Regex::new(r#"<div[^>]*data-testid="tweetText"[^>]*>(.*?)</div>"#)
            .expect("static tweet pattern"),
        user: Regex::new(r#"<div[^>]*data-testid="User-Name"[^>]*>(.*?)</div>"#)
            .expect("static user pattern"),
        handle: Regex::new(r"@([A-Za-z0-9_]+)").expect("static handle pattern"),
        time: Regex::new(r#"<time[^>]*datetime="([^"]*)"[^>]*>"#).expect("static time pattern"),
        tag: Regex::new(r"<[^>]*>").expect("static tag pattern"),
        spaces: Regex::new(r"\s+").expect("static whitespace pattern"),
    })
}

fn clean_text(fragment: &str) -> String {
    let p = patterns();
    let text = p
        .tag
        .replace_all(fragment, " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    p.spaces.replace_all(&text, " ").trim().to_string()
}

/// Extract claims from a search results page.
pub fn tweets_from_html<R: Rng + ?Sized>(html: &str, rng: &mut R) -> Vec<Claim> {
    let p = patterns();
    let users: Vec<&str> = p.user.find_iter(html).map(|m| m.as_str()).collect();
    let times: Vec<&str> = p
        .time
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    p.tweet
        .find_iter(html)
        .enumerate()
        .map(|(i, m)| {
            let text = clean_text(m.as_str());
            let username = users
                .get(i)
                .and_then(|u| p.handle.captures(u))
                .and_then(|c| c.get(1))
                .map_or("unknown", |h| h.as_str());

            Claim::new(Source::Twitter, text.clone())
                .with_summary(preview(&text, PREVIEW_CHARS))
                .with_sentiment(lexicon_sentiment(&text, SCRAPE_POSITIVE, SCRAPE_NEGATIVE))
                .with_relevance(scrape_relevance(rng.gen::<f64>()))
                .with_timestamp_str(times.get(i).copied())
                .with_username(username)
                .with_category(SourceCategory::LocalSource)
                .with_language(detect_language(&text))
                .with_verified(false)
                .with_region(first_region_mention(&text))
        })
        .collect()
}

#[derive(Clone)]
pub struct TwitterScraper {
    http: HttpClient,
}

impl TwitterScraper {
    pub fn new(base: &str) -> Result<Self> {
        let http = HttpClient::new(base).context("twitter scrape base url")?;
        Ok(Self { http })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Claim>> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CRAWLER_UA));

        let html = self
            .http
            .get_text(
                "search",
                RequestOpts {
                    headers: Some(headers),
                    query: Some(vec![("q", Cow::Borrowed(query)), ("f", Cow::Borrowed("live"))]),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .context("twitter search page")?;

        let claims = tweets_from_html(&html, &mut rand::thread_rng());
        tracing::debug!(query, claims = claims.len(), "twitter.scrape.parsed");
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    const PAGE: &str = concat!(
        r#"<article><div data-testid="User-Name" class="x"><span>Оля</span> @olya_kh</div>"#,
        r#"<time datetime="2024-02-10T12:30:00.000Z">Feb 10</time>"#,
        r#"<div lang="uk" data-testid="tweetText" dir="auto"><span>Харків &amp; область: успіх ППО</span></div></article>"#,
        r#"<article><div data-testid="tweetText"><span>Total disaster &quot;today&quot;</span></div></article>"#,
    );

    #[test]
    fn pairs_text_handles_and_times_by_position() {
        let claims = tweets_from_html(PAGE, &mut StepRng::new(0, 0));
        assert_eq!(claims.len(), 2);

        let first = &claims[0];
        assert_eq!(first.text, "Харків & область: успіх ППО");
        assert_eq!(first.username.as_deref(), Some("olya_kh"));
        assert_eq!(first.timestamp.to_rfc3339(), "2024-02-10T12:30:00+00:00");
        assert_eq!(first.region.as_deref(), Some("Kharkiv"));
        assert_eq!(first.language.as_deref(), Some("uk"));
        assert_eq!(first.sentiment, factwatch_common::Sentiment::Positive);
        assert_eq!(first.relevance_score, 0.5);

        let second = &claims[1];
        assert_eq!(second.text, "Total disaster \"today\"");
        assert_eq!(second.username.as_deref(), Some("unknown"));
        assert_eq!(second.sentiment, factwatch_common::Sentiment::Negative);
        assert_eq!(second.region, None);
    }

    #[test]
    fn page_without_tweets_is_empty() {
        assert!(tweets_from_html("<html></html>", &mut StepRng::new(0, 0)).is_empty());
    }
}
