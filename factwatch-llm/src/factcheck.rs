//! Two-step fact check of a single post: an extractor model lists the
//! verifiable claims, a search-grounded verifier rates each one.
//!
//! Every step has a canned fallback, so a check always produces a report.
//! Once extraction falls back, verification of that run does too.
use crate::demo::{demo_claims, demo_scored, demo_verdict};
use crate::openai::OpenAiClient;
use crate::parse::{parse_claim_list, parse_scored_verdict, parse_verdict};
use crate::perplexity::PerplexityClient;
use crate::traits::LlmClient;
use crate::verdict::{FactCheckReport, ScoredVerdict, Verdict};
use crate::{DEFAULT_OPENAI_MODEL, DEFAULT_PERPLEXITY_MODEL};
use factwatch_common::{FactwatchError, Result};
use std::sync::Arc;

const EXTRACT_SYSTEM: &str = "You extract verifiable factual claims from text.";
const VERIFY_SYSTEM: &str = "You are a helpful fact-checking assistant that evaluates claims for accuracy, providing truthfulness assessments and citations.";

fn extract_prompt(text: &str) -> String {
    format!(
        "Extract any concrete, factual claims from this post. Ignore opinions or vague statements.\n\
         A claim should be factual, specific, and verifiable. Return ONLY an array of claim strings.\n\
         If there are no concrete claims, return an empty array.\n\n\
         Post: \"{text}\"\n\n\
         Claims:"
    )
}

fn verify_prompt(claim: &str) -> String {
    format!(
        "Evaluate the factuality of the following claim. Provide your evaluation in JSON format with these fields:\n\
         - truthValue: one of \"definitely true\", \"likely true\", \"needs verification\", \"likely false\", \"definitely false\"\n\
         - explanation: brief explanation of your assessment (1-2 sentences)\n\
         - sources: array of source descriptions (include titles and URLs when available)\n\n\
         Claim: \"{claim}\"\n\n\
         IMPORTANT: Return ONLY a raw JSON object with no markdown formatting, code blocks, or additional text."
    )
}

fn score_prompt(claim: &str) -> String {
    format!(
        "Evaluate the factuality of the following claim. Provide your response in this exact format:\n\n\
         Claim: [repeat the claim here]\n\
         Confidence Score: [1, 2, or 3]\n\
         Explanation: [brief explanation of your evaluation]\n\
         Sources:\n\
         - Full citation 1 (include author/organization, title, and URL if available)\n\
         - Full citation 2\n\
         (if no sources, just put 'None')\n\n\
         Important: Always provide complete source citations, not just reference numbers.\n\
         Claim to evaluate: '{claim}'"
    )
}

pub struct FactChecker {
    extractor: Option<Arc<dyn LlmClient>>,
    verifier: Option<Arc<dyn LlmClient>>,
    demo_mode: bool,
}

impl FactChecker {
    pub fn new(
        extractor: Option<Arc<dyn LlmClient>>,
        verifier: Option<Arc<dyn LlmClient>>,
        demo_mode: bool,
    ) -> Self {
        Self {
            extractor,
            verifier,
            demo_mode,
        }
    }

    /// Canned answers only; never touches the network.
    pub fn demo() -> Self {
        Self::new(None, None, true)
    }

    /// OpenAI extractor plus Perplexity verifier with the default models.
    /// Blank keys leave that side unconfigured, which means demo mode.
    pub fn from_keys(openai_key: &str, perplexity_key: &str, demo_mode: bool) -> Result<Self> {
        let extractor: Option<Arc<dyn LlmClient>> = match openai_key.trim() {
            "" => None,
            key => Some(Arc::new(OpenAiClient::new(
                key.to_string(),
                DEFAULT_OPENAI_MODEL.to_string(),
            )?)),
        };
        let verifier: Option<Arc<dyn LlmClient>> = match perplexity_key.trim() {
            "" => None,
            key => Some(Arc::new(PerplexityClient::new(
                key.to_string(),
                DEFAULT_PERPLEXITY_MODEL.to_string(),
            )?)),
        };
        Ok(Self::new(extractor, verifier, demo_mode))
    }

    /// Demo whenever the flag is set or either provider is missing.
    pub fn is_demo(&self) -> bool {
        self.demo_mode || self.extractor.is_none() || self.verifier.is_none()
    }

    fn live(&self) -> Option<(&dyn LlmClient, &dyn LlmClient)> {
        if self.demo_mode {
            return None;
        }
        Some((self.extractor.as_deref()?, self.verifier.as_deref()?))
    }

    async fn extract_live(client: &dyn LlmClient, text: &str) -> Result<Vec<String>> {
        let resp = client
            .generate(&extract_prompt(text), Some(EXTRACT_SYSTEM), Some(250), Some(0.3))
            .await?;
        Ok(parse_claim_list(&resp.text))
    }

    async fn verify_live(client: &dyn LlmClient, claim: &str) -> Result<Verdict> {
        let resp = client
            .generate(&verify_prompt(claim), Some(VERIFY_SYSTEM), Some(500), Some(0.2))
            .await?;
        parse_verdict(claim, &resp.text)
            .ok_or_else(|| FactwatchError::Parse(format!("no verdict JSON in: {}", resp.text)))
    }

    /// Claims plus whether they came from the live extractor.
    async fn extract_inner(&self, text: &str) -> (Vec<String>, bool) {
        if let Some((extractor, _)) = self.live() {
            match Self::extract_live(extractor, text).await {
                Ok(claims) => return (claims, true),
                Err(e) => tracing::warn!(error = %e, "factcheck.extract.fallback"),
            }
        }
        (demo_claims(text), false)
    }

    /// Verifiable claims in `text`.
    pub async fn extract_claims(&self, text: &str) -> Vec<String> {
        self.extract_inner(text).await.0
    }

    async fn verify_one(&self, claim: &str, live: bool) -> (Verdict, bool) {
        if live {
            if let Some((_, verifier)) = self.live() {
                match Self::verify_live(verifier, claim).await {
                    Ok(v) => return (v, true),
                    Err(e) => tracing::warn!(claim, error = %e, "factcheck.verify.fallback"),
                }
            }
        }
        (demo_verdict(claim), false)
    }

    async fn verify_inner(&self, claims: &[String], live: bool) -> (Vec<Verdict>, bool) {
        let mut verdicts = Vec::with_capacity(claims.len());
        let mut all_live = true;
        for claim in claims {
            let (verdict, was_live) = self.verify_one(claim, live).await;
            all_live &= was_live;
            verdicts.push(verdict);
        }
        (verdicts, all_live)
    }

    /// One verdict per claim, in order. Failed claims get a canned verdict.
    pub async fn verify_claims(&self, claims: &[String]) -> Vec<Verdict> {
        self.verify_inner(claims, true).await.0
    }

    /// Rate one claim on the 1..=3 confidence scale.
    pub async fn score_claim(&self, claim: &str) -> ScoredVerdict {
        if let Some((_, verifier)) = self.live() {
            match verifier
                .generate(&score_prompt(claim), None, None, Some(0.3))
                .await
            {
                Ok(resp) => return parse_scored_verdict(claim, &resp.text),
                Err(e) => tracing::warn!(claim, error = %e, "factcheck.score.fallback"),
            }
        }
        demo_scored(claim)
    }

    /// Extract, then verify.
    pub async fn check(&self, text: &str) -> FactCheckReport {
        let (claims, extracted_live) = self.extract_inner(text).await;
        let (verdicts, verified_live) = self.verify_inner(&claims, extracted_live).await;
        let demo = !(extracted_live && verified_live);
        tracing::info!(claims = claims.len(), demo, "factcheck.done");
        FactCheckReport {
            text: text.to_string(),
            claims,
            verdicts,
            demo,
        }
    }
}
