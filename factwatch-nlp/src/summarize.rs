//! Extractive summaries scored by sentence position and keyword weight.
//!
//! All lengths are counted in characters, not bytes.
use factwatch_common::analysis::SummaryMode;
use regex::Regex;
use std::sync::OnceLock;

const KEYWORD_WEIGHTS: &[(&str, f64)] = &[
    ("військов", 2.0),
    ("обстріл", 2.0),
    ("атак", 2.0),
    ("оборон", 1.5),
    ("сил", 1.5),
    ("україн", 1.5),
    ("росі", 1.5),
    ("зброї", 1.8),
    ("міністер", 1.3),
    ("президент", 1.3),
    ("втрат", 1.7),
];

const REWRITES: &[(&str, &str)] = &[
    ("було повідомлено", "джерела повідомляють"),
    ("заявив", "зазначив"),
    ("сказав", "підкреслив"),
    ("вважаю", "є думка, що"),
];

fn sentence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]+").expect("static sentence pattern"))
}

fn score(sentence: &str, index: usize, total: usize) -> f64 {
    let lowered = sentence.to_lowercase();
    let position = 1.0 - (index as f64 / total as f64) * 0.5;
    position
        + KEYWORD_WEIGHTS
            .iter()
            .filter(|(kw, _)| lowered.contains(kw))
            .map(|(_, w)| w)
            .sum::<f64>()
}

/// Extractive summary of at most roughly `max_chars` characters.
///
/// Text that already fits is returned unchanged. Text without sentence
/// punctuation (or with a single sentence) is cut at `max_chars` and gets `...`.
/// Otherwise the best-scored sentences are joined until the budget is reached.
///
/// ```
/// let text = "Атака на місто. Оборона тримається. Все спокійно.";
/// assert_eq!(
///     factwatch_nlp::summarize(text, 20),
///     "Атака на місто. Оборона тримається."
/// );
/// ```
pub fn summarize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let sentences: Vec<&str> = sentence_re().find_iter(text).map(|m| m.as_str()).collect();
    if sentences.len() <= 1 {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push_str("...");
        return cut;
    }

    let total = sentences.len();
    let mut scored: Vec<(f64, &str)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| (score(s, i, total), s.trim()))
        .collect();
    // stable: equal scores keep sentence order
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut picked: Vec<&str> = Vec::new();
    let mut len = 0usize;
    for (_, sentence) in scored {
        if len >= max_chars {
            break;
        }
        len += sentence.chars().count() + 1;
        picked.push(sentence);
    }
    picked.join(" ")
}

fn rewrite(text: &str) -> String {
    REWRITES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

fn abstractive(text: &str, max_chars: usize) -> String {
    let widened = summarize(text, max_chars + max_chars / 2);
    summarize(&rewrite(&widened), max_chars)
}

/// Summary in the requested style.
///
/// `Abstractive` widens the extractive pass by half, swaps a few reporting
/// verbs, then summarizes again at `max_chars`. `Hybrid` feeds a widened
/// extractive summary through the abstractive pass.
pub fn summarize_with_mode(text: &str, max_chars: usize, mode: SummaryMode) -> String {
    match mode {
        SummaryMode::Extractive => summarize(text, max_chars),
        SummaryMode::Abstractive => abstractive(text, max_chars),
        SummaryMode::Hybrid => {
            let extractive = summarize(text, max_chars + max_chars / 2);
            abstractive(&extractive, max_chars)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Атака на місто. Оборона тримається. Все спокійно.";

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(summarize("Все спокійно.", 150), "Все спокійно.");
        assert_eq!(summarize(TEXT, TEXT.chars().count()), TEXT);
    }

    #[test]
    fn picks_weighted_sentences_first() {
        let s = summarize(TEXT, 20);
        assert_eq!(s, "Атака на місто. Оборона тримається.");
        assert_ne!(s, TEXT);
    }

    #[test]
    fn keyword_sentence_outranks_earlier_plain_one() {
        let text = "Сьогодні тепло. Сонце світить. Обстріл почався вночі.";
        assert_eq!(summarize(text, 10), "Обстріл почався вночі.");
    }

    #[test]
    fn unpunctuated_text_is_truncated_with_ellipsis() {
        let text = "обстріл тривав усю ніч без перерви";
        assert_eq!(summarize(text, 7), "обстріл...");
    }

    #[test]
    fn length_stays_within_one_sentence_of_budget() {
        let text = "Перше речення тут. Друге речення довше за перше. Третє. Четверте речення про втрати.";
        for max in [5usize, 12, 20, 40, 60] {
            let s = summarize(text, max);
            let longest = sentence_re()
                .find_iter(text)
                .map(|m| m.as_str().trim().chars().count())
                .max()
                .unwrap();
            assert!(s.chars().count() <= max + longest + 1, "max {max}: {s}");
        }
    }

    #[test]
    fn abstractive_swaps_reporting_verbs() {
        let text = "Міністр заявив про нові втрати. Президент сказав, що оборона стабільна. Погода тепла.";
        let s = summarize_with_mode(text, 40, SummaryMode::Abstractive);
        assert_eq!(s, "Президент підкреслив, що оборона стабільна.");
        assert!(!s.contains("сказав"));
    }

    #[test]
    fn hybrid_matches_abstractive_of_widened_extract() {
        let text = "Було повідомлено про атаку. Військові відбили наступ. Тиша в центрі.";
        let widened = summarize(text, 45);
        assert_eq!(
            summarize_with_mode(text, 30, SummaryMode::Hybrid),
            abstractive(&widened, 30)
        );
    }
}
