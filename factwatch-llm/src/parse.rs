//! Lenient readers for model output. Models wrap JSON in fences, prepend
//! chatter, or ignore the format entirely; each reader takes the best
//! structured reading available and reports `None` only when there is none.
use crate::verdict::{ScoredVerdict, TruthValue, Verdict};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

const NO_EXPLANATION: &str = "Unable to verify this claim.";

fn fenced_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("(?s)```json\\s*(\\{.*?\\})\\s*```").expect("static fence pattern"))
}

fn plain_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("(?s)(\\{.*\\})").expect("static object pattern"))
}

/// Try a ```json fenced object first, then the widest `{...}` span.
///
/// ```
/// use factwatch_llm::parse::extract_json_block;
///
/// let fenced = "Here:\n```json\n{\"a\": 1}\n```";
/// assert_eq!(extract_json_block(fenced).as_deref(), Some("{\"a\": 1}"));
/// assert_eq!(extract_json_block("x {\"b\": {\"c\": 2}} y").as_deref(), Some("{\"b\": {\"c\": 2}}"));
/// assert_eq!(extract_json_block("no json"), None);
/// ```
pub fn extract_json_block(text: &str) -> Option<String> {
    if let Some(caps) = fenced_re().captures(text) {
        return Some(caps.get(1)?.as_str().to_string());
    }
    plain_re()
        .captures(text)
        .and_then(|c| c.get(1).map(|m| m.as_str().to_string()))
}

fn non_empty(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Claims from an extraction answer: a JSON string array (bare or embedded),
/// otherwise one claim per line.
pub fn parse_claim_list(text: &str) -> Vec<String> {
    let text = text.trim();
    if let Ok(list) = serde_json::from_str::<Vec<String>>(text) {
        return non_empty(list);
    }
    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            if let Ok(list) = serde_json::from_str::<Vec<String>>(&text[start..=end]) {
                return non_empty(list);
            }
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('[') && !l.starts_with(']'))
        .filter(|l| !l.starts_with("```"))
        .map(|l| {
            let l = l.strip_prefix("- ").unwrap_or(l);
            let l = l.strip_prefix('"').unwrap_or(l);
            let l = l.strip_suffix(',').unwrap_or(l);
            l.strip_suffix('"').unwrap_or(l).to_string()
        })
        .filter(|l| !l.is_empty())
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SourceRef {
    Text(String),
    Cited {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl SourceRef {
    fn into_text(self) -> Option<String> {
        match self {
            SourceRef::Text(s) => Some(s),
            SourceRef::Cited { title, url } => match (title, url) {
                (Some(t), Some(u)) => Some(format!("{t} ({u})")),
                (Some(t), None) => Some(t),
                (None, Some(u)) => Some(u),
                (None, None) => None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerdictWire {
    #[serde(default, rename = "truthValue", alias = "truth_value")]
    truth_value: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    sources: Option<Vec<SourceRef>>,
}

/// Verdict JSON for `claim`. Unknown truth values read as "needs verification".
pub fn parse_verdict(claim: &str, text: &str) -> Option<Verdict> {
    let json = extract_json_block(text)?;
    let wire: VerdictWire = serde_json::from_str(&json).ok()?;

    let truth_value = wire
        .truth_value
        .and_then(|t| t.parse::<TruthValue>().ok())
        .unwrap_or_default();
    let explanation = wire
        .explanation
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| NO_EXPLANATION.to_string());
    let sources = wire
        .sources
        .unwrap_or_default()
        .into_iter()
        .filter_map(SourceRef::into_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Some(Verdict {
        claim: claim.to_string(),
        truth_value,
        explanation,
        sources,
    })
}

/// Read the "Confidence Score / Explanation / Sources" layout. Missing or
/// malformed scores count as 1.
pub fn parse_scored_verdict(claim: &str, text: &str) -> ScoredVerdict {
    let confidence_score = text
        .split_once("Confidence Score:")
        .and_then(|(_, rest)| rest.lines().next())
        .and_then(|line| line.trim().chars().next())
        .and_then(|c| c.to_digit(10))
        .map_or(1, |d| d.clamp(1, 3) as u8);

    let explanation = text
        .split_once("Explanation:")
        .map(|(_, rest)| rest.split("Sources:").next().unwrap_or_default().trim().to_string())
        .unwrap_or_default();

    let sources = match text.split_once("Sources:") {
        Some((_, rest)) if !rest.trim().eq_ignore_ascii_case("none") => rest
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('['))
            .map(|l| l.trim_start_matches('-').trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    ScoredVerdict {
        claim: claim.to_string(),
        confidence_score,
        explanation,
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_list_prefers_json_arrays() {
        assert_eq!(
            parse_claim_list(r#"["Bridge closed on Monday", "  ", "Power restored"]"#),
            vec!["Bridge closed on Monday", "Power restored"]
        );
        assert_eq!(
            parse_claim_list("Claims:\n```json\n[\"Only one\"]\n```"),
            vec!["Only one"]
        );
    }

    #[test]
    fn claim_list_falls_back_to_lines() {
        let text = "[\n- \"First claim\",\n\"Second claim\"\n]\n\n";
        assert_eq!(parse_claim_list(text), vec!["First claim", "Second claim"]);
        assert!(parse_claim_list("   ").is_empty());
    }

    #[test]
    fn verdict_survives_fences_and_chatter() {
        let text = "Sure!\n```json\n{\"truthValue\": \"Likely False\", \"explanation\": \"Contradicted by records.\", \"sources\": [\"Reuters\", {\"title\": \"AP\", \"url\": \"https://apnews.com\"}]}\n```";
        let v = parse_verdict("c", text).unwrap();
        assert_eq!(v.truth_value, TruthValue::LikelyFalse);
        assert_eq!(v.explanation, "Contradicted by records.");
        assert_eq!(v.sources, vec!["Reuters", "AP (https://apnews.com)"]);
    }

    #[test]
    fn verdict_defaults_fill_gaps() {
        let v = parse_verdict("c", "{\"truthValue\": \"probably\"}").unwrap();
        assert_eq!(v.truth_value, TruthValue::NeedsVerification);
        assert_eq!(v.explanation, NO_EXPLANATION);
        assert!(v.sources.is_empty());
        assert!(parse_verdict("c", "no object here").is_none());
        assert!(parse_verdict("c", "{not json}").is_none());
    }

    #[test]
    fn scored_verdict_reads_structured_layout() {
        let text = "Claim: x\nConfidence Score: 3\nExplanation: Matches official data.\nSources:\n- Ministry report (https://example.org)\n[1]\n- Local news";
        let s = parse_scored_verdict("x", text);
        assert_eq!(s.confidence_score, 3);
        assert_eq!(s.explanation, "Matches official data.");
        assert_eq!(s.sources, vec!["Ministry report (https://example.org)", "Local news"]);
    }

    #[test]
    fn scored_verdict_clamps_and_defaults() {
        assert_eq!(parse_scored_verdict("x", "Confidence Score: 9\nSources: None").confidence_score, 3);
        let s = parse_scored_verdict("x", "Confidence Score: high\nSources:\nNone");
        assert_eq!(s.confidence_score, 1);
        assert!(s.sources.is_empty());
        assert_eq!(parse_scored_verdict("x", "garbage").confidence_score, 1);
    }
}
