//! Claim and analysis-result types shared by fetchers, analytics, and the aggregator.
//!
//! Field names serialize in camelCase because the dashboard consumes these
//! snapshots verbatim.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Platform a claim was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Twitter,
    Telegram,
    Reddit,
    Facebook,
    Web,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::Twitter,
        Source::Telegram,
        Source::Reddit,
        Source::Facebook,
        Source::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Twitter => "twitter",
            Source::Telegram => "telegram",
            Source::Reddit => "reddit",
            Source::Facebook => "facebook",
            Source::Web => "web",
        }
    }

    /// Display name used for the `platform` attribute.
    pub fn platform_name(&self) -> &'static str {
        match self {
            Source::Twitter => "Twitter",
            Source::Telegram => "Telegram",
            Source::Reddit => "Reddit",
            Source::Facebook => "Facebook",
            Source::Web => "Web",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = crate::FactwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" | "x" => Ok(Source::Twitter),
            "telegram" => Ok(Source::Telegram),
            "reddit" => Ok(Source::Reddit),
            "facebook" => Ok(Source::Facebook),
            "web" => Ok(Source::Web),
            other => Err(crate::FactwatchError::Config(format!(
                "unknown source: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// Coarse classification of the account or channel that published a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    Government,
    MajorMedia,
    IndependentJournalist,
    LocalSource,
    MilitaryAffiliated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterType {
    Figure,
    Place,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(rename = "type")]
    pub kind: ClusterType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// One social-media post plus its derived annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(default)]
    pub id: String,
    pub source: Source,
    pub text: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SourceCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Cluster>,
}

impl Claim {
    /// Start a claim with a fresh id, the platform's display name, and "now" as timestamp.
    ///
    /// ```
    /// use factwatch_common::{Claim, Source};
    ///
    /// let claim = Claim::new(Source::Telegram, "Обстріл Харкова").with_relevance(1.7);
    /// assert_eq!(claim.relevance_score, 1.0);
    /// assert_eq!(claim.platform.as_deref(), Some("Telegram"));
    /// ```
    pub fn new(source: Source, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source,
            text: text.into(),
            summary: String::new(),
            sentiment: Sentiment::Neutral,
            relevance_score: 0.0,
            timestamp: Utc::now(),
            username: None,
            platform: Some(source.platform_name().to_string()),
            followers: None,
            category: None,
            language: None,
            verified: None,
            region: None,
            cluster: None,
        }
    }

    /// Relevance is always kept inside `[0, 1]`; NaN collapses to 0.
    pub fn with_relevance(mut self, score: f64) -> Self {
        self.relevance_score = clamp_relevance(score);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = ts;
        self
    }

    /// Parse an RFC 3339 timestamp; anything unparsable keeps the ingestion time.
    pub fn with_timestamp_str(mut self, raw: Option<&str>) -> Self {
        if let Some(ts) = raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok()) {
            self.timestamp = ts.with_timezone(&Utc);
        }
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_followers(mut self, followers: Option<u64>) -> Self {
        self.followers = followers;
        self
    }

    pub fn with_category(mut self, category: SourceCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }
}

pub fn clamp_relevance(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentBreakdown {
    pub fn from_claims(claims: &[Claim]) -> Self {
        claims.iter().fold(Self::default(), |mut acc, c| {
            match c.sentiment {
                Sentiment::Positive => acc.positive += 1,
                Sentiment::Negative => acc.negative += 1,
                Sentiment::Neutral => acc.neutral += 1,
            }
            acc
        })
    }
}

/// Ranked `(name, count)` lists per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub people: Vec<(String, usize)>,
    pub organizations: Vec<(String, usize)>,
    pub locations: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterCounts {
    pub figure: BTreeMap<String, usize>,
    pub place: BTreeMap<String, usize>,
}

impl ClusterCounts {
    pub fn get(&self, kind: ClusterType) -> &BTreeMap<String, usize> {
        match kind {
            ClusterType::Figure => &self.figure,
            ClusterType::Place => &self.place,
        }
    }

    pub fn get_mut(&mut self, kind: ClusterType) -> &mut BTreeMap<String, usize> {
        match kind {
            ClusterType::Figure => &mut self.figure,
            ClusterType::Place => &mut self.place,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Immutable snapshot produced by one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub claims: Vec<Claim>,
    pub total_posts: usize,
    pub sources: BTreeMap<Source, usize>,
    pub sentiment_breakdown: SentimentBreakdown,
    pub source_categories: BTreeMap<SourceCategory, usize>,
    pub key_terms: Vec<String>,
    pub regions: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<EntitySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clusters: Option<ClusterCounts>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

/// Count claims per source in a single pass.
pub fn count_sources(claims: &[Claim]) -> BTreeMap<Source, usize> {
    claims.iter().fold(BTreeMap::new(), |mut acc, c| {
        *acc.entry(c.source).or_insert(0) += 1;
        acc
    })
}

pub fn count_categories(claims: &[Claim]) -> BTreeMap<SourceCategory, usize> {
    claims
        .iter()
        .filter_map(|c| c.category)
        .fold(BTreeMap::new(), |mut acc, cat| {
            *acc.entry(cat).or_insert(0) += 1;
            acc
        })
}
