//! Cleaning filters applied to fetched claims before enrichment.
use factwatch_common::analysis::CleaningConfig;
use factwatch_common::Claim;
use regex::Regex;
use std::sync::OnceLock;

fn bot_patterns() -> &'static [Regex] {
    static P: OnceLock<Vec<Regex>> = OnceLock::new();
    P.get_or_init(|| {
        [r"(?i)\[automated\]", r"(?i)bot_", r"\d{8,}"]
            .into_iter()
            .map(|p| Regex::new(p).expect("static bot pattern"))
            .collect()
    })
}

fn ad_pattern() -> &'static Regex {
    static P: OnceLock<Regex> = OnceLock::new();
    P.get_or_init(|| {
        Regex::new(r"(?i)купити|купить|продаж|продажа|реклама|знижк|скидк|переходь за посиланням")
            .expect("static ad pattern")
    })
}

/// Automated-looking account or text: `[automated]` tags, `bot_` handles,
/// or runs of eight or more digits.
///
/// ```
/// use factwatch_common::{Claim, Source};
/// use factwatch_collect::filters::is_bot;
///
/// assert!(is_bot(&Claim::new(Source::Twitter, "hi").with_username("user12345678")));
/// assert!(!is_bot(&Claim::new(Source::Twitter, "hi").with_username("olena")));
/// ```
pub fn is_bot(claim: &Claim) -> bool {
    let username = claim.username.as_deref().unwrap_or_default();
    bot_patterns()
        .iter()
        .any(|p| p.is_match(username) || p.is_match(&claim.text))
}

pub fn is_ad(claim: &Claim) -> bool {
    ad_pattern().is_match(&claim.text)
}

/// Claims without a language always pass.
pub fn language_allowed(claim: &Claim, allowed: &[String]) -> bool {
    claim
        .language
        .as_deref()
        .map_or(true, |lang| allowed.iter().any(|a| a == lang))
}

/// Bots, then ads, then languages; each step only when switched on.
pub fn apply_cleaning(claims: Vec<Claim>, cleaning: &CleaningConfig, allowed: &[String]) -> Vec<Claim> {
    let before = claims.len();
    let kept: Vec<Claim> = claims
        .into_iter()
        .filter(|c| !(cleaning.remove_bots && is_bot(c)))
        .filter(|c| !(cleaning.remove_ads && is_ad(c)))
        .filter(|c| !cleaning.filter_languages || language_allowed(c, allowed))
        .collect();
    if kept.len() != before {
        tracing::debug!(before, after = kept.len(), "collect.cleaning.dropped");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use factwatch_common::Source;

    fn claim(text: &str) -> Claim {
        Claim::new(Source::Telegram, text)
    }

    #[test]
    fn bot_markers_match_text_or_username() {
        assert!(is_bot(&claim("[AUTOMATED] daily digest")));
        assert!(is_bot(&claim("hello").with_username("News_BOT_ua")));
        assert!(is_bot(&claim("order 123456789")));
        assert!(!is_bot(&claim("1234567 is only seven digits")));
    }

    #[test]
    fn ads_are_case_insensitive() {
        assert!(is_ad(&claim("КУПИТИ генератор зі ЗНИЖКОЮ")));
        assert!(is_ad(&claim("Переходь за посиланням")));
        assert!(!is_ad(&claim("Обстріл Харкова")));
    }

    #[test]
    fn switches_are_respected() {
        let allowed = vec!["uk".to_string()];
        let claims = vec![
            claim("реклама"),
            claim("[automated]"),
            claim("Hallo").with_language("de"),
            claim("no language"),
        ];

        let all_on = CleaningConfig::default();
        let kept = apply_cleaning(claims.clone(), &all_on, &allowed);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "no language");

        let all_off = CleaningConfig {
            remove_bots: false,
            remove_ads: false,
            filter_languages: false,
            enable_translation: false,
        };
        assert_eq!(apply_cleaning(claims, &all_off, &allowed).len(), 4);
    }
}
