use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Five-step truth scale used by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TruthValue {
    #[serde(rename = "definitely true")]
    DefinitelyTrue,
    #[serde(rename = "likely true")]
    LikelyTrue,
    #[default]
    #[serde(rename = "needs verification")]
    NeedsVerification,
    #[serde(rename = "likely false")]
    LikelyFalse,
    #[serde(rename = "definitely false")]
    DefinitelyFalse,
}

impl TruthValue {
    pub const ALL: [TruthValue; 5] = [
        TruthValue::DefinitelyTrue,
        TruthValue::LikelyTrue,
        TruthValue::NeedsVerification,
        TruthValue::LikelyFalse,
        TruthValue::DefinitelyFalse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TruthValue::DefinitelyTrue => "definitely true",
            TruthValue::LikelyTrue => "likely true",
            TruthValue::NeedsVerification => "needs verification",
            TruthValue::LikelyFalse => "likely false",
            TruthValue::DefinitelyFalse => "definitely false",
        }
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TruthValue {
    type Err = String;

    /// Case-insensitive; `_` and `-` count as spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', '-'], " ");
        TruthValue::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| format!("unknown truth value: {s}"))
    }
}

/// Verifier outcome for one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub claim: String,
    pub truth_value: TruthValue,
    pub explanation: String,
    pub sources: Vec<String>,
}

/// Outcome of the structured "Confidence Score" prompt; scores run 1..=3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredVerdict {
    pub claim: String,
    pub confidence_score: u8,
    pub explanation: String,
    pub sources: Vec<String>,
}

/// Everything one `check` run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckReport {
    pub text: String,
    pub claims: Vec<String>,
    pub verdicts: Vec<Verdict>,
    /// True when any step fell back to canned answers.
    pub demo: bool,
}
