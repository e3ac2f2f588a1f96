use crate::normalize::normalize_term;
use crate::rank::Tally;
use factwatch_common::Claim;

pub const DEFAULT_KEY_TERM_COUNT: usize = 15;

const STRIPPED: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

const STOP_WORDS: &[&str] = &[
    "і", "в", "на", "з", "до", "що", "не", "та", "за", "у", "як", "від", "про", "але", "по", "це",
    "при", "так", "щоб", "and", "the", "to", "in", "of", "for", "with", "that", "is", "are",
];

/// Lowercased, punctuation-stripped tokens longer than three characters that
/// are not stop-words.
pub fn tokens(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Top `count` canonical stems across all claim texts.
///
/// ```
/// use factwatch_common::{Claim, Source};
/// use factwatch_nlp::extract_key_terms;
///
/// let claims = vec![
///     Claim::new(Source::Twitter, "Евакуація з міста триває"),
///     Claim::new(Source::Telegram, "Евакуацію продовжено, місто спокійне"),
/// ];
/// let terms = extract_key_terms(&claims, 2);
/// assert_eq!(terms, vec!["евакуац".to_string(), "місто".to_string()]);
/// ```
pub fn extract_key_terms(claims: &[Claim], count: usize) -> Vec<String> {
    let mut tally = Tally::default();
    for claim in claims {
        for token in tokens(&claim.text) {
            tally.bump(normalize_term(&token));
        }
    }
    tally.top(count).into_iter().map(|(term, _)| term).collect()
}
