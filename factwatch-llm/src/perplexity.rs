use crate::chat::ChatEndpoint;
use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use factwatch_common::Result;
use std::time::Duration;

pub const PERPLEXITY_API_BASE: &str = "https://api.perplexity.ai/";

/// Perplexity's search-grounded chat models. Same wire format as OpenAI, but
/// answers come with web citations, which is what the verifier needs.
pub struct PerplexityClient {
    endpoint: ChatEndpoint,
}

impl PerplexityClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base(PERPLEXITY_API_BASE, api_key, model)
    }

    pub fn with_base(base: &str, api_key: String, model: String) -> Result<Self> {
        let endpoint =
            ChatEndpoint::new("perplexity", base, api_key, model, Duration::from_secs(30))?;
        Ok(Self { endpoint })
    }
}

#[async_trait]
impl LlmClient for PerplexityClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        self.endpoint
            .complete(prompt, system_prompt, max_tokens, temperature)
            .await
    }

    fn model_name(&self) -> &str {
        self.endpoint.model()
    }
}
