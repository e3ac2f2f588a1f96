const UKRAINIAN_MARKERS: &[&str] = &["ї", "є", "і", "ґ", "україн"];
const RUSSIAN_MARKERS: &[&str] = &["ы", "ъ", "э", "росси"];

/// Guess `uk` or `ru` by counting marker letters and roots. Ties (including
/// text with no markers at all) resolve to `uk`.
///
/// ```
/// assert_eq!(factwatch_nlp::detect_language("Ситуація в Україні"), "uk");
/// assert_eq!(factwatch_nlp::detect_language("Это было в России"), "ru");
/// assert_eq!(factwatch_nlp::detect_language("no markers"), "uk");
/// ```
pub fn detect_language(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    let hits = |markers: &[&str]| markers.iter().filter(|m| lowered.contains(*m)).count();
    if hits(RUSSIAN_MARKERS) > hits(UKRAINIAN_MARKERS) {
        "ru"
    } else {
        "uk"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_needs_a_strict_majority() {
        // one marker each: "і" vs "ы"
        assert_eq!(detect_language("і ы"), "uk");
        assert_eq!(detect_language("мы съели это"), "ru");
    }
}
