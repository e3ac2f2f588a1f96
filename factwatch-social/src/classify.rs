//! Keyword heuristics shared by the fetchers: account category, provisional
//! sentiment lexicons, and relevance scoring.
use factwatch_common::{clamp_relevance, SourceCategory};

pub const TWITTER_POSITIVE: &[&str] = &["перемога", "успіх", "звільнення", "добре", "надія"];
pub const TWITTER_NEGATIVE: &[&str] = &["атака", "бомба", "загибель", "поразка", "втрати"];

pub const SCRAPE_POSITIVE: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "успіх", "перемога",
];
pub const SCRAPE_NEGATIVE: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "disaster", "провал", "катастрофа",
];

pub const TELEGRAM_POSITIVE: &[&str] = &["перемога", "успіх", "звільнення", "захистили", "відбили"];
pub const TELEGRAM_NEGATIVE: &[&str] = &["обстріл", "атака", "втрати", "загроза", "жертви"];

const RELEVANCE_CAP: f64 = 0.95;

/// Category from a profile description, checked in priority order.
///
/// ```
/// use factwatch_common::SourceCategory;
/// use factwatch_social::classify::category_from_description;
///
/// assert_eq!(
///     category_from_description(Some("Official account of the Ministry")),
///     SourceCategory::Government
/// );
/// assert_eq!(category_from_description(None), SourceCategory::LocalSource);
/// ```
pub fn category_from_description(description: Option<&str>) -> SourceCategory {
    let d = description.unwrap_or_default().to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| d.contains(w));
    if any(&["govern", "official", "міністер", "президент"]) {
        SourceCategory::Government
    } else if any(&["news", "media", "press", "новини"]) {
        SourceCategory::MajorMedia
    } else if any(&["journalist", "reporter", "correspondent", "журналіст"]) {
        SourceCategory::IndependentJournalist
    } else if any(&["military", "army", "soldier", "війська", "армія"]) {
        SourceCategory::MilitaryAffiliated
    } else {
        SourceCategory::LocalSource
    }
}

/// Category from a Telegram channel handle. Matching is case-sensitive
/// (`NOW`, `ZSU` are upper-case in the handles that use them).
pub fn category_from_channel(channel: &str) -> SourceCategory {
    let any = |words: &[&str]| words.iter().any(|w| channel.contains(w));
    if any(&["ministry", "official", "verkhovnarada"]) {
        SourceCategory::Government
    } else if any(&["news", "NOW", "media"]) {
        SourceCategory::MajorMedia
    } else if any(&["ZSU", "defense"]) {
        SourceCategory::MilitaryAffiliated
    } else {
        SourceCategory::LocalSource
    }
}

/// `min(0.95, 0.5 + jitter·0.3 + 0.15 if verified)`
pub fn api_relevance(jitter: f64, verified: bool) -> f64 {
    let boost = if verified { 0.15 } else { 0.0 };
    clamp_relevance((0.5 + jitter * 0.3 + boost).min(RELEVANCE_CAP))
}

/// `0.5 + jitter·0.4`
pub fn scrape_relevance(jitter: f64) -> f64 {
    clamp_relevance(0.5 + jitter * 0.4)
}

/// `min(0.95, 0.6 + jitter·0.3 + 0.1 for government channels)`
pub fn telegram_relevance(jitter: f64, category: SourceCategory) -> f64 {
    let boost = if category == SourceCategory::Government { 0.1 } else { 0.0 };
    clamp_relevance((0.6 + jitter * 0.3 + boost).min(RELEVANCE_CAP))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_priority() {
        assert_eq!(
            category_from_description(Some("Military NEWS from the front")),
            SourceCategory::MajorMedia
        );
        assert_eq!(
            category_from_description(Some("Журналіст, Харків")),
            SourceCategory::IndependentJournalist
        );
        assert_eq!(
            category_from_description(Some("Служу в ЗСУ, армія")),
            SourceCategory::MilitaryAffiliated
        );
    }

    #[test]
    fn channel_categories() {
        assert_eq!(category_from_channel("verkhovnaradaofukraine"), SourceCategory::Government);
        assert_eq!(category_from_channel("V_Zelenskiy_official"), SourceCategory::Government);
        assert_eq!(category_from_channel("UkraineNow"), SourceCategory::LocalSource);
        assert_eq!(category_from_channel("ukrainenowenglish"), SourceCategory::LocalSource);
        assert_eq!(category_from_channel("truexanewsua"), SourceCategory::MajorMedia);
        assert_eq!(category_from_channel("operativnoZSU"), SourceCategory::MilitaryAffiliated);
    }

    #[test]
    fn relevance_stays_capped() {
        assert_eq!(api_relevance(0.0, false), 0.5);
        assert_eq!(api_relevance(1.0, true), 0.95);
        assert!((scrape_relevance(0.5) - 0.7).abs() < 1e-9);
        assert_eq!(telegram_relevance(1.0, SourceCategory::Government), 0.95);
        assert!((telegram_relevance(0.0, SourceCategory::LocalSource) - 0.6).abs() < 1e-9);
    }
}
