//! Fixed demo data. Used when mock mode is on and whenever the live pipeline
//! fails, so callers always get a well-formed result.
use chrono::{DateTime, Duration, Utc};
use factwatch_common::{
    count_categories, count_sources, AnalysisResult, Claim, Sentiment, SentimentBreakdown, Source,
    SourceCategory,
};
use rand::Rng;
use std::collections::BTreeMap;

pub const MOCK_KEY_TERMS: &[&str] = &[
    "обстріли",
    "евакуація",
    "гуманітарна допомога",
    "протиповітряна оборона",
    "енергетична інфраструктура",
    "військова техніка",
    "Харківська область",
    "Донецька область",
    "Херсонська область",
];

struct MockPost {
    /// `None` means a coin flip between Twitter and Telegram.
    source: Option<Source>,
    minutes_ago: i64,
    username: &'static str,
    followers: u64,
    category: SourceCategory,
    verified: Option<bool>,
    region: &'static str,
    sentiment: Sentiment,
    relevance: f64,
    text: &'static str,
    summary: &'static str,
}

const BASE_POSTS: &[MockPost] = &[
    MockPost {
        source: Some(Source::Twitter),
        minutes_ago: 30,
        username: "UkrInform",
        followers: 780_000,
        category: SourceCategory::Government,
        verified: Some(true),
        region: "Kharkiv",
        sentiment: Sentiment::Negative,
        relevance: 0.94,
        text: "Повідомляють про серйозні пошкодження інфраструктури в Харківській області після останніх обстрілів. Місцева влада закликає до евакуації цивільних з прикордонних районів.",
        summary: "Reports of significant infrastructure damage in Kharkiv region after recent shelling. Local authorities urging civilian evacuation from border areas.",
    },
    MockPost {
        source: Some(Source::Twitter),
        minutes_ago: 120,
        username: "GeneralStaff_UA",
        followers: 450_000,
        category: SourceCategory::MilitaryAffiliated,
        verified: Some(true),
        region: "Multiple",
        sentiment: Sentiment::Positive,
        relevance: 0.88,
        text: "Зенітні підрозділи Повітряних сил збили 11 із 16 безпілотників \"Шахед\" та 2 крилаті ракети минулої ночі. Протиповітряна оборона працювала в кількох областях.",
        summary: "Air defense units intercepted 11 of 16 Shahed drones and 2 cruise missiles overnight. Air defense systems were active across several regions.",
    },
    MockPost {
        source: Some(Source::Twitter),
        minutes_ago: 15,
        username: "Humanitarian_Aid",
        followers: 125_000,
        category: SourceCategory::IndependentJournalist,
        verified: Some(false),
        region: "Kharkiv",
        sentiment: Sentiment::Negative,
        relevance: 0.92,
        text: "Надзвичайна гуманітарна ситуація у Вовчанську. Волонтери повідомляють про нестачу питної води та медикаментів. Необхідна термінова допомога.",
        summary: "Critical humanitarian situation in Vovchansk. Volunteers report shortages of drinking water and medical supplies. Urgent aid needed.",
    },
    MockPost {
        source: Some(Source::Twitter),
        minutes_ago: 180,
        username: "WarMonitor",
        followers: 340_000,
        category: SourceCategory::IndependentJournalist,
        verified: Some(true),
        region: "Donetsk",
        sentiment: Sentiment::Neutral,
        relevance: 0.87,
        text: "Ситуація на сході залишається напруженою. За останню добу зафіксовано 78 обстрілів у напрямку Лиману та Куп'янська. Наші захисники тримають оборону.",
        summary: "Situation in the east remains tense. 78 shellings recorded in the direction of Lyman and Kupyansk in the past day. Our defenders are holding the defense.",
    },
    MockPost {
        source: Some(Source::Telegram),
        minutes_ago: 45,
        username: "Emergency_Channel",
        followers: 1_250_000,
        category: SourceCategory::Government,
        verified: None,
        region: "Dnipropetrovsk",
        sentiment: Sentiment::Negative,
        relevance: 0.96,
        text: "Термінове повідомлення: в результаті ударів по енергетичній інфраструктурі можливі відключення електроенергії в Дніпропетровській та Запорізькій областях. Будьте готові та зарядіть пристрої.",
        summary: "Urgent alert: Power outages possible in Dnipropetrovsk and Zaporizhzhia regions due to energy infrastructure strikes. Be prepared and charge devices.",
    },
    MockPost {
        source: Some(Source::Telegram),
        minutes_ago: 180,
        username: "VolunteersUnited",
        followers: 85_000,
        category: SourceCategory::IndependentJournalist,
        verified: None,
        region: "Kherson",
        sentiment: Sentiment::Positive,
        relevance: 0.81,
        text: "Сьогодні відбулася відправка чергової партії гуманітарної допомоги у звільнені території. 5 вантажівок з продуктами, водою та генераторами вирушили до Херсонської області.",
        summary: "Another batch of humanitarian aid dispatched to liberated territories today. 5 trucks with food, water, and generators headed to Kherson region.",
    },
    MockPost {
        source: Some(Source::Telegram),
        minutes_ago: 60,
        username: "Evacuation_Donetsk",
        followers: 320_000,
        category: SourceCategory::Government,
        verified: None,
        region: "Donetsk",
        sentiment: Sentiment::Negative,
        relevance: 0.98,
        text: "Увага! Термінова евакуація з населених пунктів: Торецьк, Часів Яр, Костянтинівка. Збір о 09:00 біля міської адміністрації. З собою мати документи та найнеобхідніші речі.",
        summary: "Attention! Urgent evacuation from settlements: Toretsk, Chasiv Yar, Kostiantynivka. Assembly at 09:00 near city administration. Bring documents and essential items.",
    },
    MockPost {
        source: Some(Source::Telegram),
        minutes_ago: 120,
        username: "Intel_Observer",
        followers: 430_000,
        category: SourceCategory::MilitaryAffiliated,
        verified: None,
        region: "Belgorod Border",
        sentiment: Sentiment::Neutral,
        relevance: 0.89,
        text: "Аналіз супутникових знімків виявив переміщення військової техніки в напрямку Бєлгородської області. Можливе посилення ворожого угруповання на північно-східному напрямку.",
        summary: "Satellite imagery analysis reveals military equipment movement toward Belgorod region. Possible reinforcement of enemy forces in northeastern direction.",
    },
    MockPost {
        source: Some(Source::Telegram),
        minutes_ago: 30,
        username: "LocalNews_Kherson",
        followers: 58_000,
        category: SourceCategory::LocalSource,
        verified: None,
        region: "Kherson",
        sentiment: Sentiment::Neutral,
        relevance: 0.77,
        text: "Місцеві жителі повідомляють про сильні вибухи в районі Скадовська. Офіційного підтвердження поки немає. Чекаємо на інформацію від військової адміністрації.",
        summary: "Local residents report powerful explosions in Skadovsk area. No official confirmation yet. Awaiting information from military administration.",
    },
];

const KHARKIV_POST: MockPost = MockPost {
    source: None,
    minutes_ago: 5,
    username: "Kharkiv_Updates",
    followers: 230_000,
    category: SourceCategory::LocalSource,
    verified: Some(false),
    region: "Kharkiv",
    sentiment: Sentiment::Neutral,
    relevance: 0.93,
    text: "Нові дані про ситуацію в Харківській області: населені пункти поблизу кордону регулярно обстрілюються, проте лінія фронту залишається стабільною.",
    summary: "New data on the situation in Kharkiv region: settlements near the border are regularly shelled, but the front line remains stable.",
};

const EVACUATION_POST: MockPost = MockPost {
    source: None,
    minutes_ago: 10,
    username: "Evacuation_Coordinator",
    followers: 178_000,
    category: SourceCategory::Government,
    verified: Some(true),
    region: "Multiple",
    sentiment: Sentiment::Positive,
    relevance: 0.91,
    text: "Оновлення щодо евакуації: сьогодні з небезпечних районів вивезено понад 300 цивільних, включаючи 45 дітей. Евакуація триває.",
    summary: "Evacuation update: More than 300 civilians, including 45 children, were evacuated from dangerous areas today. Evacuation ongoing.",
};

const AID_POST: MockPost = MockPost {
    source: None,
    minutes_ago: 25,
    username: "HumanitarianAid_UA",
    followers: 195_000,
    category: SourceCategory::IndependentJournalist,
    verified: Some(false),
    region: "Kyiv",
    sentiment: Sentiment::Positive,
    relevance: 0.86,
    text: "Міжнародні організації збільшують обсяги гуманітарної допомоги для постраждалих регіонів. Цього тижня очікується прибуття 20 вантажівок з медикаментами та продуктами.",
    summary: "International organizations are increasing humanitarian aid for affected regions. 20 trucks with medicines and food are expected to arrive this week.",
};

fn to_claim<R: Rng + ?Sized>(post: &MockPost, now: DateTime<Utc>, rng: &mut R) -> Claim {
    let source = post.source.unwrap_or_else(|| {
        if rng.gen_bool(0.5) {
            Source::Twitter
        } else {
            Source::Telegram
        }
    });
    let mut claim = Claim::new(source, post.text)
        .with_summary(post.summary)
        .with_sentiment(post.sentiment)
        .with_relevance(post.relevance)
        .with_timestamp(now - Duration::minutes(post.minutes_ago))
        .with_username(post.username)
        .with_followers(Some(post.followers))
        .with_category(post.category)
        .with_language("uk")
        .with_region(Some(post.region.to_string()));
    claim.verified = post.verified;
    claim
}

/// The nine base claims plus any query-specific ones (Kharkiv, evacuation,
/// humanitarian aid), in that order.
pub fn mock_claims<R: Rng + ?Sized>(query: &str, now: DateTime<Utc>, rng: &mut R) -> Vec<Claim> {
    let q = query.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| q.contains(w));

    let mut posts: Vec<&MockPost> = BASE_POSTS.iter().collect();
    if has(&["kharkiv", "харків"]) {
        posts.push(&KHARKIV_POST);
    }
    if has(&["evacuat", "евакуац"]) {
        posts.push(&EVACUATION_POST);
    }
    if has(&["aid", "humanitarian", "гуманітар"]) {
        posts.push(&AID_POST);
    }

    posts.into_iter().map(|p| to_claim(p, now, rng)).collect()
}

/// Mock claims restricted to `sources` and sorted by relevance, with every
/// count recomputed over what is left. Entities, clusters and alerts are not produced.
pub fn mock_result<R: Rng + ?Sized>(
    query: &str,
    sources: &[Source],
    now: DateTime<Utc>,
    rng: &mut R,
) -> AnalysisResult {
    let mut claims: Vec<Claim> = mock_claims(query, now, rng)
        .into_iter()
        .filter(|c| sources.contains(&c.source))
        .collect();
    claims.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

    let regions = claims
        .iter()
        .filter_map(|c| c.region.clone())
        .fold(BTreeMap::new(), |mut acc, r| {
            *acc.entry(r).or_insert(0) += 1;
            acc
        });

    let mut key_terms: Vec<String> = MOCK_KEY_TERMS.iter().map(|t| t.to_string()).collect();
    if !query.is_empty() {
        key_terms.push(query.to_string());
    }

    AnalysisResult {
        total_posts: claims.len(),
        sources: count_sources(&claims),
        sentiment_breakdown: SentimentBreakdown::from_claims(&claims),
        source_categories: count_categories(&claims),
        key_terms,
        regions,
        entities: None,
        clusters: None,
        alerts: Vec::new(),
        claims,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn base_set_has_nine_claims() {
        let claims = mock_claims("drones", Utc::now(), &mut StepRng::new(0, 0));
        assert_eq!(claims.len(), 9);
        assert_eq!(claims.iter().filter(|c| c.source == Source::Twitter).count(), 4);
        assert!(claims.iter().all(|c| c.language.as_deref() == Some("uk")));
    }

    #[test]
    fn query_specific_claims_are_appended() {
        let claims = mock_claims("Евакуація та гуманітарна допомога", Utc::now(), &mut StepRng::new(0, 0));
        assert_eq!(claims.len(), 11);
        assert_eq!(claims[9].username.as_deref(), Some("Evacuation_Coordinator"));
        assert_eq!(claims[10].username.as_deref(), Some("HumanitarianAid_UA"));
    }

    #[test]
    fn timestamps_are_relative_to_now() {
        let now = Utc::now();
        let claims = mock_claims("", now, &mut StepRng::new(0, 0));
        assert_eq!(claims[0].timestamp, now - Duration::minutes(30));
    }

    #[test]
    fn result_is_filtered_and_recounted() {
        let result = mock_result("Харків", &[Source::Telegram], Utc::now(), &mut StepRng::new(0, 0));
        assert!(result.claims.iter().all(|c| c.source == Source::Telegram));
        assert_eq!(result.total_posts, result.claims.len());
        assert_eq!(result.sources.get(&Source::Telegram), Some(&result.claims.len()));
        assert_eq!(result.sources.get(&Source::Twitter), None);
        assert_eq!(result.key_terms.last().map(String::as_str), Some("Харків"));
        assert_eq!(result.regions.get("Kherson"), Some(&2));
        assert_eq!(result.claims[0].username.as_deref(), Some("Evacuation_Donetsk"));
    }
}
