//! Optional AI narrative through an OpenAI-compatible chat-completions endpoint (Groq).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use suilens::{AiNarrative, CondensedSummary};

use crate::config::NarrativeConfig;
use crate::errors::{ConfigError, NarrativeError};

pub const NO_EXPLANATION: &str = "No explanation returned.";

const PROVIDER_SUFFIX: &str = "(via Groq)";

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Fixed when the provider is built.
    fn is_available(&self) -> bool;

    /// A single request, never retried.
    async fn request_narrative(
        &self,
        summary: &CondensedSummary,
    ) -> Result<AiNarrative, NarrativeError>;
}

pub struct GroqNarrator {
    api_key: Option<String>,
    endpoint: Url,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GroqNarrator {
    pub fn new(config: &NarrativeConfig, timeout: Duration) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| ConfigError::Invalid {
            field: "narrative.endpoint",
            message: e.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "narrative",
                message: e.to_string(),
            })?;

        Ok(Self {
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    pub fn model_label(&self) -> String {
        format!("{} {PROVIDER_SUFFIX}", self.model)
    }
}

pub fn build_prompt(summary: &CondensedSummary) -> String {
    let data = serde_json::to_string_pretty(summary).unwrap_or_default();
    format!(
        "You are a blockchain expert assistant.
Analyze the following Sui transaction summary JSON and provide a 2-3 sentence explanation in plain English.
Focus on: Who sent what? What function was called? What was the outcome?
Do not mention internal object IDs or raw large numbers. Use \"Sender\" and \"Receiver\" where appropriate.

Transaction Data:
{data}

Explanation:
"
    )
}

#[async_trait]
impl NarrativeProvider for GroqNarrator {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request_narrative(
        &self,
        summary: &CondensedSummary,
    ) -> Result<AiNarrative, NarrativeError> {
        let Some(api_key) = &self.api_key else {
            return Err(NarrativeError::NotConfigured);
        };

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(summary),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: 1.0,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await
            .map_err(|e| NarrativeError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or_else(|_| format!("{status}: {body}"));
            return Err(NarrativeError::Api(message));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::Http(e.to_string()))?;

        let text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| NO_EXPLANATION.to_string());

        Ok(AiNarrative {
            text: text.trim().to_string(),
            model_label: self.model_label(),
        })
    }
}

/// Runs the narrative request for a user who asked for it.
///
/// `None` when the provider is unavailable. Failures come back as their display message;
/// they never abort the explanation.
pub async fn ai_outcome(
    provider: &dyn NarrativeProvider,
    summary: &CondensedSummary,
) -> Option<Result<AiNarrative, String>> {
    if !provider.is_available() {
        tracing::debug!("narrative provider not configured, keeping heuristic narrative");
        return None;
    }

    Some(provider.request_narrative(summary).await.map_err(|e| {
        tracing::warn!(error = %e, "AI narrative failed");
        e.to_string()
    }))
}
