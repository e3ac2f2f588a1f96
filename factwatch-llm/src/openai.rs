use crate::chat::ChatEndpoint;
use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use factwatch_common::Result;
use std::time::Duration;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";

pub struct OpenAiClient {
    endpoint: ChatEndpoint,
}

impl OpenAiClient {
    /// Create a new client for the given API key and model.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base(OPENAI_API_BASE, api_key, model)
    }

    /// Point at an OpenAI-compatible gateway instead of the public API.
    pub fn with_base(base: &str, api_key: String, model: String) -> Result<Self> {
        let endpoint = ChatEndpoint::new("openai", base, api_key, model, Duration::from_secs(30))?;
        Ok(Self { endpoint })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let system = system_prompt.unwrap_or("You are an objective, unbiased researcher.");
        self.endpoint
            .complete(prompt, Some(system), max_tokens, temperature)
            .await
    }

    fn model_name(&self) -> &str {
        self.endpoint.model()
    }
}
