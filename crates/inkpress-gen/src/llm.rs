//! Chat completion client.

use inkpress_core::config::AppConfig;
use inkpress_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// One message in a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Connection settings for the completions endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub completions_url: String,
    pub user_agent: String,
    pub dry_run: bool,
}

impl From<&AppConfig> for LlmConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            api_key: cfg.openrouter_api_key.clone(),
            completions_url: cfg.completions_url.clone(),
            user_agent: cfg.user_agent.clone(),
            dry_run: cfg.dry_run,
        }
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
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-style chat completions API.
pub struct LlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { config, client })
    }

    /// Send a message sequence to `model` and return the completion text.
    ///
    /// In dry-run mode returns a deterministic stub built from the last user
    /// message, without touching the network. An empty or malformed
    /// completion is an error; callers never receive blank article text.
    pub async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        if self.config.dry_run {
            let last_user = messages
                .iter()
                .rev()
                .find(|m| m.role == "user")
                .map(|m| m.content.as_str())
                .unwrap_or_default();
            return Ok(format!("[dry-run:{model}] {last_user}"));
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::MissingConfig("OPENROUTER_API_KEY"))?;

        debug!(model, messages = messages.len(), "requesting completion");
        let response = self
            .client
            .post(&self.config.completions_url)
            .bearer_auth(api_key)
            .json(&serde_json::json!({ "model": model, "messages": messages }))
            .timeout(COMPLETION_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(Error::EmptyCompletion(model.to_string()));
        }
        Ok(content)
    }
}
