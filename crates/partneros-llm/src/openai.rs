//! HTTP client for an OpenAI-compatible chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use partneros_core::AppConfig;
use reqwest::Client;
use serde::Deserialize;

use crate::error::LlmError;
use crate::prompts::{classify_request, summarize_request, synthesis_request, ChatRequest};
use crate::retry::retry_with_backoff;
use crate::service::{InsightGenerator, TextClassifier, TextSummarizer};
use crate::types::{SynthesisRequest, SynthesisResponse};

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub classify_model: String,
    pub summarize_model: String,
    pub insight_model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl OpenAiConfig {
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.openai_api_key.clone()?;
        Some(Self {
            api_key,
            base_url: config.openai_base_url.clone(),
            classify_model: config.classify_model.clone(),
            summarize_model: config.summarize_model.clone(),
            insight_model: config.insight_model.clone(),
            timeout_secs: config.llm_timeout_secs,
            max_retries: config.llm_max_retries,
            backoff_base_ms: config.llm_retry_backoff_base_ms,
        })
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("classify_model", &self.classify_model)
            .field("summarize_model", &self.summarize_model)
            .field("insight_model", &self.insight_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client implementing every text-service role.
///
/// Transient failures are retried with back-off; see [`OpenAiConfig`] for the
/// knobs. Point `base_url` at a mock server in tests.
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("partneros/0.1")
            .build()?;

        let config = OpenAiConfig {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            ..config
        };

        Ok(Self { client, config })
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        retry_with_backoff(self.config.max_retries, self.config.backoff_base_ms, || {
            self.send_once(&url, request)
        })
        .await
    }

    async fn send_once(&self, url: &str, request: &ChatRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TextClassifier for OpenAiClient {
    async fn classify(&self, title: &str, body_prefix: &str) -> Result<String, LlmError> {
        let request = classify_request(&self.config.classify_model, title, body_prefix);
        self.chat(&request).await
    }
}

#[async_trait]
impl TextSummarizer for OpenAiClient {
    async fn summarize(&self, body_prefix: &str) -> Result<String, LlmError> {
        let request = summarize_request(&self.config.summarize_model, body_prefix);
        self.chat(&request).await
    }
}

#[async_trait]
impl InsightGenerator for OpenAiClient {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResponse, LlmError> {
        let chat_request = synthesis_request(&self.config.insight_model, request)?;
        let content = self.chat(&chat_request).await?;
        SynthesisResponse::parse(&content)
    }
}
