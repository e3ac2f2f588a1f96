//! Search-query expansion with common declension forms.
use regex::Regex;
use std::sync::OnceLock;

const FORMS_PER_QUERY: usize = 5;

const UKRAINIAN: &[(&str, &[&str])] = &[
    (
        "військов",
        &["військовий", "військових", "військові", "військовими", "військову"],
    ),
    ("обстріл", &["обстріли", "обстрілів", "обстрілами", "обстрілу", "обстрілом"]),
    ("атак", &["атака", "атаки", "атакам", "атакою", "атакували"]),
    ("оборон", &["оборона", "оборону", "обороні", "обороною", "оборони"]),
    ("евакуац", &["евакуація", "евакуації", "евакуацію", "евакуацією", "евакуаційні"]),
    ("біженц", &["біженці", "біженців", "біженцям", "біженцями", "біженцях"]),
    ("харків", &["харківський", "харківська", "харківське", "харківські", "харківських"]),
];

const RUSSIAN: &[(&str, &[&str])] = &[
    ("военн", &["военный", "военная", "военное", "военные", "военных"]),
    ("обстрел", &["обстрелы", "обстрелов", "обстрелами", "обстрелу", "обстрелом"]),
    ("атак", &["атака", "атаки", "атаке", "атаку", "атакой"]),
    ("оборон", &["оборона", "обороны", "обороне", "оборону", "обороной"]),
    ("эвакуац", &["эвакуация", "эвакуации", "эвакуацию", "эвакуацией", "эвакуационный"]),
    ("беженц", &["беженцы", "беженцев", "беженцам", "беженцами", "беженцах"]),
    ("харьков", &["харьковский", "харьковская", "харьковское", "харьковские", "харьковских"]),
];

fn ukrainian_letters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[іїєґ]").expect("static letter class"))
}

fn russian_letters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[ыъэё]").expect("static letter class"))
}

fn first_expansion(lowered: &str, table: &[(&str, &[&str])]) -> Option<String> {
    table
        .iter()
        .find(|(stem, _)| lowered.contains(stem))
        .map(|(_, forms)| {
            forms
                .iter()
                .take(FORMS_PER_QUERY)
                .copied()
                .collect::<Vec<_>>()
                .join(" OR ")
        })
}

/// Append ` OR `-joined declension forms for the first known stem in `query`.
///
/// Queries with Ukrainian letters, or with neither alphabet's marker letters,
/// use the Ukrainian table; queries with Russian letters use the Russian one.
///
/// ```
/// assert_eq!(
///     factwatch_nlp::enhance_query("обстріл Харкова"),
///     "обстріл Харкова OR обстріли OR обстрілів OR обстрілами OR обстрілу OR обстрілом"
/// );
/// assert_eq!(factwatch_nlp::enhance_query("drones"), "drones");
/// ```
pub fn enhance_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    let has_uk = ukrainian_letters().is_match(query);
    let has_ru = russian_letters().is_match(query);

    let mut enhanced = query.to_string();
    if has_uk || !has_ru {
        if let Some(extra) = first_expansion(&lowered, UKRAINIAN) {
            enhanced.push_str(" OR ");
            enhanced.push_str(&extra);
        }
    }
    if has_ru {
        if let Some(extra) = first_expansion(&lowered, RUSSIAN) {
            enhanced.push_str(" OR ");
            enhanced.push_str(&extra);
        }
    }
    if enhanced != query {
        tracing::debug!(query, enhanced = %enhanced, "query.enhanced");
    }
    enhanced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_query_uses_russian_forms() {
        assert_eq!(
            enhance_query("эвакуация Харькова"),
            "эвакуация Харькова OR эвакуация OR эвакуации OR эвакуацию OR эвакуацией OR эвакуационный"
        );
    }

    #[test]
    fn only_first_matching_stem_expands() {
        let out = enhance_query("атака та оборона");
        assert_eq!(out.matches(" OR ").count(), 5);
        assert!(out.contains("атакою"));
        assert!(!out.contains("обороні"));
    }

    #[test]
    fn mixed_alphabet_expands_both() {
        // "ї" marks Ukrainian, "ы" marks Russian
        let out = enhance_query("військові обстрелы");
        assert!(out.contains("військових"));
        assert!(out.contains("обстрелов"));
    }
}
