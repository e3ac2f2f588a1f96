//! Canned answers used when no provider is configured or a call fails.
//! Keyword checks are case-sensitive substring matches.
use crate::verdict::{ScoredVerdict, TruthValue, Verdict};

/// Two claims chosen from keywords in `text`, or two slices of it.
///
/// ```
/// let claims = factwatch_llm::demo::demo_claims("new climate report");
/// assert_eq!(claims[1], "CO2 is not a significant contributor to climate change");
/// ```
pub fn demo_claims(text: &str) -> Vec<String> {
    let has = |w: &str| text.contains(w);
    let pair = |a: &str, b: &str| vec![a.to_string(), b.to_string()];

    if has("vaccine") || has("covid") {
        pair(
            "COVID-19 vaccines cause serious side effects in 50% of recipients",
            "Vaccinated people shed spike proteins to the unvaccinated",
        )
    } else if has("election") || has("vote") {
        pair(
            "The 2020 election had widespread voter fraud",
            "Mail-in ballots are not verified",
        )
    } else if has("climate") {
        pair(
            "Global temperatures have not increased in the last decade",
            "CO2 is not a significant contributor to climate change",
        )
    } else {
        let head: String = text.chars().take(30).collect();
        let tail: String = text.chars().skip(30).take(30).collect();
        vec![
            format!("{head}... is factually correct"),
            format!("{tail}... needs verification"),
        ]
    }
}

/// Verdict picked from keywords in `claim`.
pub fn demo_verdict(claim: &str) -> Verdict {
    let has = |w: &str| claim.contains(w);
    let (truth_value, explanation, sources): (TruthValue, &str, &[&str]) =
        if has("vaccine") || has("shed") {
            (
                TruthValue::DefinitelyFalse,
                "This claim has been thoroughly debunked by medical research.",
                &[
                    "CDC: COVID-19 Vaccines (https://www.cdc.gov/coronavirus/2019-ncov/vaccines/)",
                    "WHO: COVID-19 Vaccine Research (https://www.who.int/emergencies/diseases/novel-coronavirus-2019/covid-19-vaccines)",
                ],
            )
        } else if has("election") || has("fraud") || has("mail-in") {
            (
                TruthValue::DefinitelyFalse,
                "Multiple audits and court cases have found no evidence of widespread fraud.",
                &[
                    "AP News: Fact Check on 2020 Election (https://apnews.com/article/election-2020-ap-fact-check)",
                    "Reuters: Fact Check on Mail-in Voting (https://www.reuters.com/article/us-usa-election-vote-by-mail-explainer)",
                ],
            )
        } else if has("climate") || has("CO2") {
            (
                TruthValue::DefinitelyFalse,
                "Scientific consensus confirms rising temperatures and CO2 impact.",
                &[
                    "NASA: Climate Change Evidence (https://climate.nasa.gov/evidence/)",
                    "IPCC: Climate Change 2021 Report (https://www.ipcc.ch/report/ar6/wg1/)",
                ],
            )
        } else if has("factually correct") {
            (
                TruthValue::LikelyTrue,
                "This appears to be accurate based on available information.",
                &["Various news sources have reported similar information"],
            )
        } else {
            (
                TruthValue::NeedsVerification,
                "Insufficient information to make a determination.",
                &["No specific sources found for this claim"],
            )
        };

    Verdict {
        claim: claim.to_string(),
        truth_value,
        explanation: explanation.to_string(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
    }
}

/// Scored form of [`demo_verdict`]: definite verdicts score 3, likely ones 2,
/// everything else 1.
pub fn demo_scored(claim: &str) -> ScoredVerdict {
    let verdict = demo_verdict(claim);
    let confidence_score = match verdict.truth_value {
        TruthValue::DefinitelyTrue | TruthValue::DefinitelyFalse => 3,
        TruthValue::LikelyTrue | TruthValue::LikelyFalse => 2,
        TruthValue::NeedsVerification => 1,
    };
    ScoredVerdict {
        claim: verdict.claim,
        confidence_score,
        explanation: verdict.explanation,
        sources: verdict.sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_claims() {
        assert_eq!(demo_claims("covid is over")[0], "COVID-19 vaccines cause serious side effects in 50% of recipients");
        assert_eq!(demo_claims("go vote")[1], "Mail-in ballots are not verified");
    }

    #[test]
    fn slices_are_character_based() {
        let text = "Київ".repeat(10);
        let claims = demo_claims(&text);
        assert_eq!(claims[0], format!("{}... is factually correct", "Київ".repeat(7) + "Ки"));
        assert_eq!(claims[1], format!("їв{}... needs verification", "Київ".repeat(2)));

        let short = demo_claims("short");
        assert_eq!(short, vec!["short... is factually correct", "... needs verification"]);
    }

    #[test]
    fn verdicts_follow_claim_keywords() {
        for claim in demo_claims("vaccine news") {
            assert_eq!(demo_verdict(&claim).truth_value, TruthValue::DefinitelyFalse);
        }
        assert_eq!(demo_verdict("abc... is factually correct").truth_value, TruthValue::LikelyTrue);
        let unknown = demo_verdict("... needs verification");
        assert_eq!(unknown.truth_value, TruthValue::NeedsVerification);
        assert_eq!(unknown.sources, vec!["No specific sources found for this claim"]);
    }

    #[test]
    fn scored_demo_maps_certainty() {
        assert_eq!(demo_scored("The 2020 election had widespread voter fraud").confidence_score, 3);
        // keyword checks are case-sensitive
        assert_eq!(demo_scored("Mail-in ballots are not verified").confidence_score, 1);
        assert_eq!(demo_scored("x is factually correct").confidence_score, 2);
        assert_eq!(demo_scored("anything").confidence_score, 1);
    }
}
