//! `POST chat/completions` wire format shared by OpenAI and Perplexity.
use crate::traits::LlmResponse;
use factwatch_common::{FactwatchError, Result};
use factwatch_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

/// Bearer-authenticated chat-completions endpoint.
#[derive(Clone)]
pub(crate) struct ChatEndpoint {
    http: HttpClient,
    api_key: String,
    model: String,
    provider: &'static str,
}

impl ChatEndpoint {
    pub(crate) fn new(
        provider: &'static str,
        base: &str,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let http = HttpClient::new(base)
            .map_err(|e| FactwatchError::Config(format!("{provider} base url: {e}")))?
            .with_timeout(timeout);
        Ok(Self {
            http,
            api_key,
            model,
            provider,
        })
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    pub(crate) async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let req = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        tracing::debug!(provider = self.provider, model = %self.model, "llm.chat.request");
        let resp: ChatResponse = self
            .http
            .post_json(
                "chat/completions",
                &req,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.api_key)),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| http_to_llm(self.provider, e))?;

        let text = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| FactwatchError::Llm(format!("{}: no choices returned", self.provider)))?;

        Ok(LlmResponse {
            text,
            model: resp.model.or_else(|| Some(self.model.clone())),
            tokens_used: resp.usage.and_then(|u| u.total_tokens),
            confidence: None,
        })
    }
}

fn http_to_llm(provider: &str, e: HttpError) -> FactwatchError {
    FactwatchError::Llm(format!("{provider}: {e}"))
}
