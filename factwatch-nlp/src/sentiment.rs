use factwatch_common::Sentiment;

/// Pipeline sentiment. Scoring is intentionally disabled, so every claim is
/// neutral; the field stays on [`factwatch_common::Claim`] for compatibility.
pub fn analyze_sentiment(_text: &str) -> Sentiment {
    Sentiment::Neutral
}

/// Provisional sentiment from substring hits against two word lists. Used by
/// fetchers before the pipeline overwrites it.
///
/// ```
/// use factwatch_common::Sentiment;
/// use factwatch_nlp::lexicon_sentiment;
///
/// let pos = ["перемога", "успіх"];
/// let neg = ["атака", "втрати"];
/// assert_eq!(lexicon_sentiment("Перемога під Харковом", &pos, &neg), Sentiment::Positive);
/// assert_eq!(lexicon_sentiment("атака і втрати", &pos, &neg), Sentiment::Negative);
/// assert_eq!(lexicon_sentiment("успіх, але атака", &pos, &neg), Sentiment::Neutral);
/// ```
pub fn lexicon_sentiment(text: &str, positive: &[&str], negative: &[&str]) -> Sentiment {
    let lowered = text.to_lowercase();
    let pos = positive.iter().filter(|w| lowered.contains(*w)).count();
    let neg = negative.iter().filter(|w| lowered.contains(*w)).count();
    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}
