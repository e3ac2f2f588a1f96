//! Telegram channel search through an HTTP proxy.
//!
//! The proxy owns the Telegram session; we POST `{proxy}/search` with the
//! channel list and get plain messages back.
use crate::classify::{category_from_channel, telegram_relevance, TELEGRAM_NEGATIVE, TELEGRAM_POSITIVE};
use crate::source::{preview, ClaimSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use factwatch_common::{Claim, Source, SourceCategory};
use factwatch_http::{HttpClient, RequestOpts};
use factwatch_nlp::lexicon_sentiment;
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const DEFAULT_CHANNELS: &[&str] = &[
    "truexanewsua",
    "ukrainenowenglish",
    "verkhovnaradaofukraine",
    "V_Zelenskiy_official",
    "operativnoZSU",
    "ministry_of_defense_ua",
    "UkraineNow",
];

const PREVIEW_CHARS: usize = 200;
const DEFAULT_LANGUAGE: &str = "uk";

/// Plain keyword → English region name, matched case-sensitively.
///
/// Finer-grained than `factwatch_nlp::detect::REGION_KEYWORDS`: Donetsk and
/// Luhansk stay separate here but fold into `Donbas` in the text scan, and
/// Bakhmut has no text-scan entry. A claim tagged `Donetsk` that names the
/// city therefore counts once under each name in the region map.
const REGION_WORDS: &[(&str, &str)] = &[
    ("Київ", "Kyiv"),
    ("Харків", "Kharkiv"),
    ("Одеса", "Odesa"),
    ("Львів", "Lviv"),
    ("Донецьк", "Donetsk"),
    ("Луганськ", "Luhansk"),
    ("Херсон", "Kherson"),
    ("Маріуполь", "Mariupol"),
    ("Бахмут", "Bakhmut"),
    ("Чернігів", "Chernihiv"),
    ("Суми", "Sumy"),
    ("Запоріжжя", "Zaporizhzhia"),
];

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    channels: &'a [String],
    query: &'a str,
    limit: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default)]
    pub date: Option<MessageDate>,
    pub channel: String,
    #[serde(default)]
    pub channel_subscribers: Option<u64>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Proxies report either unix seconds or an RFC 3339 string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageDate {
    Unix(i64),
    Text(String),
}

impl MessageDate {
    fn to_rfc3339(&self) -> Option<String> {
        match self {
            MessageDate::Unix(secs) => OffsetDateTime::from_unix_timestamp(*secs)
                .ok()
                .and_then(|t| t.format(&Rfc3339).ok()),
            MessageDate::Text(s) => Some(s.clone()),
        }
    }
}

fn region_of(text: &str) -> Option<String> {
    REGION_WORDS
        .iter()
        .find(|(word, _)| text.contains(word))
        .map(|(_, name)| name.to_string())
}

/// Map proxy messages into claims.
pub fn messages_to_claims<R: Rng + ?Sized>(messages: Vec<Message>, rng: &mut R) -> Vec<Claim> {
    messages
        .into_iter()
        .map(|msg| {
            let category = category_from_channel(&msg.channel);
            let verified = matches!(
                category,
                SourceCategory::Government | SourceCategory::MilitaryAffiliated
            );
            let timestamp = msg.date.as_ref().and_then(MessageDate::to_rfc3339);

            Claim::new(Source::Telegram, msg.text.clone())
                .with_summary(preview(&msg.text, PREVIEW_CHARS))
                .with_sentiment(lexicon_sentiment(&msg.text, TELEGRAM_POSITIVE, TELEGRAM_NEGATIVE))
                .with_relevance(telegram_relevance(rng.gen::<f64>(), category))
                .with_timestamp_str(timestamp.as_deref())
                .with_username(msg.channel)
                .with_followers(msg.channel_subscribers)
                .with_category(category)
                .with_language(msg.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()))
                .with_verified(verified)
                .with_region(region_of(&msg.text))
        })
        .collect()
}

#[derive(Clone)]
pub struct TelegramSource {
    http: HttpClient,
    channels: Vec<String>,
}

impl TelegramSource {
    /// An empty `channels` list means [`DEFAULT_CHANNELS`].
    pub fn new(proxy_url: &str, channels: Vec<String>) -> Result<Self> {
        let http = HttpClient::new(proxy_url).context("telegram proxy url")?;
        let channels = if channels.is_empty() {
            DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect()
        } else {
            channels
        };
        Ok(Self { http, channels })
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }
}

#[async_trait]
impl ClaimSource for TelegramSource {
    fn source(&self) -> Source {
        Source::Telegram
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Claim>> {
        let body = SearchRequest {
            channels: &self.channels,
            query,
            limit,
        };
        let resp: SearchResponse = self
            .http
            .post_json(
                "search",
                &body,
                RequestOpts {
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .context("telegram proxy search")?;

        let mut claims = messages_to_claims(resp.messages, &mut rand::thread_rng());
        claims.truncate(limit);
        tracing::debug!(channels = self.channels.len(), claims = claims.len(), "telegram.fetch.done");
        Ok(claims)
    }
}
