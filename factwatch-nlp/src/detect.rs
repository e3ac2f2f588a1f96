//! Region, entity and cluster counting by static table scan.
use crate::rank::Tally;
use factwatch_common::{Claim, ClusterCounts, ClusterType, EntitySummary};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const TOP_PEOPLE: usize = 15;
pub const TOP_ORGANIZATIONS: usize = 10;
pub const TOP_LOCATIONS: usize = 15;

/// Canonical region name → lowercase keyword variants (Ukrainian and Russian).
pub const REGION_KEYWORDS: &[(&str, &[&str])] = &[
    ("Kyiv", &["київ", "київська", "столиц", "киев", "киевская"]),
    ("Kharkiv", &["харків", "харьков", "харківськ", "харьковск"]),
    ("Odesa", &["одес", "одесса", "одеськ", "одесск"]),
    ("Lviv", &["львів", "львов", "львівськ", "львовск"]),
    ("Donbas", &["донбас", "донецьк", "луганськ", "донбасс", "донецк", "луганск"]),
    ("Crimea", &["крим", "крым", "кримськ", "крымск"]),
    ("Kherson", &["херсон", "херсонськ", "херсонск"]),
    ("Mariupol", &["маріуполь", "мариуполь", "маріупольськ", "мариупольск"]),
    ("Zaporizhzhia", &["запоріжжя", "запоріз", "запорож", "запорожье"]),
    ("Mykolaiv", &["миколаїв", "николаев", "миколаївськ", "николаевск"]),
    ("Chernihiv", &["чернігів", "чернигов", "чернігівськ", "черниговск"]),
    ("Sumy", &["суми", "сумы", "сумськ", "сумск"]),
    ("Zhytomyr", &["житомир", "житомирськ", "житомирск"]),
    ("Poltava", &["полтав", "полтавськ", "полтавск"]),
    ("Dnipro", &["дніпро", "днепр", "дніпропетровськ", "днепропетровск"]),
    ("Vinnytsia", &["вінниц", "винниц", "вінницьк", "винницк"]),
];

const PEOPLE: &[(&str, &str)] = &[
    ("Zelensky", r"Зеленськ"),
    ("Putin", r"Путін"),
    ("Biden", r"Байден"),
    ("Scholz", r"Шольц"),
    ("Macron", r"Макрон"),
    ("Johnson", r"Джонсон"),
    ("Stoltenberg", r"Столтенберг"),
    ("Shoigu", r"Шойгу"),
    ("Reznikov", r"Резніков"),
];

const ORGANIZATIONS: &[(&str, &str)] = &[
    ("NATO", r"\bНАТО\b"),
    ("UN", r"\bООН\b"),
    ("European Union", r"Європейськ\w*\s+Союз|\bЄС\b"),
    ("Red Cross", r"Червон\w*\s+Хрест"),
    ("ZSU", r"\bЗСУ\b"),
    ("Ministry", r"Міністерств"),
    ("Verkhovna Rada", r"Верховн\w*\s+Рад"),
    ("Kremlin", r"Кремл"),
    ("Pentagon", r"Пентагон"),
];

const FIGURES: &[(&str, &str)] = &[
    ("Zelensky", r"(?i)Зеленськ"),
    ("Putin", r"(?i)Путін"),
    ("Biden", r"(?i)Байден"),
    ("Stoltenberg", r"(?i)Столтенберг"),
    ("Macron", r"(?i)Макрон"),
    ("Scholz", r"(?i)Шольц"),
    ("Kuleba", r"(?i)Кулеб"),
    ("Syrsky", r"(?i)Сирськ"),
];

const PLACES: &[(&str, &str)] = &[
    ("Kyiv", r"(?i)Київ|Киев"),
    ("Kharkiv", r"(?i)Харків|Харьков"),
    ("Donbas", r"(?i)Донбас"),
    ("Crimea", r"(?i)Крим|Крым"),
    ("Mariupol", r"(?i)Маріуполь|Мариуполь"),
    ("Odesa", r"(?i)Одеса|Одесса"),
    ("Lviv", r"(?i)Львів|Львов"),
    ("Donetsk", r"(?i)Донецьк|Донецк"),
    ("Luhansk", r"(?i)Луганськ|Луганск"),
    ("Kherson", r"(?i)Херсон"),
];

struct Pattern {
    name: &'static str,
    re: Regex,
}

fn compile(table: &'static [(&'static str, &'static str)]) -> Vec<Pattern> {
    table
        .iter()
        .map(|(name, pat)| Pattern {
            name: *name,
            re: Regex::new(pat).expect("static entity pattern"),
        })
        .collect()
}

fn people() -> &'static [Pattern] {
    static P: OnceLock<Vec<Pattern>> = OnceLock::new();
    P.get_or_init(|| compile(PEOPLE))
}

fn organizations() -> &'static [Pattern] {
    static P: OnceLock<Vec<Pattern>> = OnceLock::new();
    P.get_or_init(|| compile(ORGANIZATIONS))
}

fn cluster_patterns(kind: ClusterType) -> &'static [Pattern] {
    static FIG: OnceLock<Vec<Pattern>> = OnceLock::new();
    static PLACE: OnceLock<Vec<Pattern>> = OnceLock::new();
    match kind {
        ClusterType::Figure => FIG.get_or_init(|| compile(FIGURES)),
        ClusterType::Place => PLACE.get_or_init(|| compile(PLACES)),
    }
}

/// Canonical regions whose keywords appear in `lowered` (already lowercase).
fn regions_in(lowered: &str) -> impl Iterator<Item = &'static str> + '_ {
    REGION_KEYWORDS
        .iter()
        .filter(move |(_, variants)| variants.iter().any(|v| lowered.contains(v)))
        .map(|(name, _)| *name)
}

/// First region (in table order) mentioned by `text`.
///
/// ```
/// assert_eq!(
///     factwatch_nlp::first_region_mention("Київ і Харків під обстрілом").as_deref(),
///     Some("Kyiv")
/// );
/// assert_eq!(factwatch_nlp::first_region_mention("quiet day"), None);
/// ```
pub fn first_region_mention(text: &str) -> Option<String> {
    regions_in(&text.to_lowercase()).next().map(str::to_string)
}

/// Region → mention count.
///
/// A claim's own `region` attribute earns one credit, and its text earns at
/// most one more per region, so a claim that declares `Kyiv` and also mentions
/// Kyiv counts twice.
pub fn extract_regions(claims: &[Claim]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for claim in claims {
        if let Some(region) = claim.region.as_deref().filter(|r| !r.is_empty()) {
            *counts.entry(region.to_string()).or_insert(0) += 1;
        }
    }
    for claim in claims {
        let lowered = claim.text.to_lowercase();
        for region in regions_in(&lowered) {
            *counts.entry(region.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// People, organizations and locations ranked by how many claims mention them.
pub fn extract_entities(claims: &[Claim]) -> EntitySummary {
    let mut people_tally = Tally::default();
    let mut org_tally = Tally::default();
    let mut loc_tally = Tally::default();

    for claim in claims {
        for p in people().iter().filter(|p| p.re.is_match(&claim.text)) {
            people_tally.bump(p.name);
        }
        for o in organizations().iter().filter(|o| o.re.is_match(&claim.text)) {
            org_tally.bump(o.name);
        }
        let lowered = claim.text.to_lowercase();
        for region in regions_in(&lowered) {
            loc_tally.bump(region);
        }
    }

    EntitySummary {
        people: people_tally.top(TOP_PEOPLE),
        organizations: org_tally.top(TOP_ORGANIZATIONS),
        locations: loc_tally.top(TOP_LOCATIONS),
    }
}

/// Raw `figure` / `place` counts; each claim counts once per matching name.
pub fn detect_clusters(claims: &[Claim]) -> ClusterCounts {
    let mut out = ClusterCounts::default();
    for kind in [ClusterType::Figure, ClusterType::Place] {
        let bucket = out.get_mut(kind);
        for claim in claims {
            for p in cluster_patterns(kind).iter().filter(|p| p.re.is_match(&claim.text)) {
                *bucket.entry(p.name.to_string()).or_insert(0) += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use factwatch_common::Source;

    fn claim(text: &str, region: Option<&str>) -> Claim {
        Claim::new(Source::Telegram, text).with_region(region.map(str::to_string))
    }

    #[test]
    fn attribute_and_text_credits_are_separate() {
        let claims = vec![claim("обстріли Харків", None), claim("generic text", Some("Kyiv"))];
        let regions = extract_regions(&claims);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions["Kharkiv"], 1);
        assert_eq!(regions["Kyiv"], 1);
    }

    #[test]
    fn declared_and_mentioned_region_counts_twice() {
        let claims = vec![claim("Київ прокинувся від вибухів", Some("Kyiv"))];
        assert_eq!(extract_regions(&claims)["Kyiv"], 2);
    }

    #[test]
    fn one_text_credit_per_region_per_claim() {
        let claims = vec![claim("Харків, Харківська область, Харьков", None)];
        assert_eq!(extract_regions(&claims)["Kharkiv"], 1);
    }

    #[test]
    fn empty_text_contributes_nothing() {
        let claims = vec![claim("", None)];
        assert!(extract_regions(&claims).is_empty());
        assert_eq!(extract_entities(&claims), EntitySummary::default());
        assert_eq!(detect_clusters(&claims), ClusterCounts::default());
    }

    #[test]
    fn entities_are_keyed_by_canonical_name() {
        let claims = vec![
            claim("Зеленський зустрівся з Байденом, Київ приймав гостей", None),
            claim("Зеленського підтримали в НАТО", None),
            claim("ЗСУ відбили атаку під Херсоном; натовп вийшов на вулиці", None),
        ];
        let e = extract_entities(&claims);
        assert_eq!(e.people[0], ("Zelensky".to_string(), 2));
        assert_eq!(e.people[1], ("Biden".to_string(), 1));
        assert_eq!(
            e.organizations,
            vec![("NATO".to_string(), 1), ("ZSU".to_string(), 1)]
        );
        assert_eq!(
            e.locations,
            vec![("Kyiv".to_string(), 1), ("Kherson".to_string(), 1)]
        );
    }

    #[test]
    fn clusters_are_case_insensitive() {
        let claims = vec![
            claim("ПУТІН погрожує, але Київ не здасться", None),
            claim("путіна засудили; в Одесі тихо, Одеса працює", None),
        ];
        let c = detect_clusters(&claims);
        assert_eq!(c.figure["Putin"], 2);
        assert_eq!(c.place["Kyiv"], 1);
        assert_eq!(c.place["Odesa"], 1);
        assert!(!c.place.contains_key("Kharkiv"));
    }
}
