//! Generative-answer provider
//!
//! Talks to any OpenAI-compatible chat-completions endpoint. Response bodies
//! are parsed as raw JSON so several provider shapes are accepted.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{AgentError, AgentResult};

/// Persona sent ahead of every question
pub const PERSONA_PREAMBLE: &str =
    "You are Liam, a chat bot designed to assist users with a wide range of topics.";

const PROVIDER_NAME: &str = "generative";

/// Something that can answer a free-text question
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn ask(&self, prompt: &str) -> AgentResult<String>;
}

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

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat-completions client
#[derive(Clone)]
pub struct GenerativeClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
}

impl GenerativeClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: Option<u32>,
    ) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    /// Create client from config; the API key comes from the configured
    /// environment variable or the keyring.
    pub fn from_config(config: &ProviderConfig) -> AgentResult<Self> {
        let api_key = crate::security::resolve_api_key(&config.api_key_env)
            .ok_or_else(|| missing_key_error(&config.api_key_env))?;
        Ok(Self::new(
            config.base_url.clone(),
            api_key,
            config.model.clone(),
            Some(config.max_tokens),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> AgentResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-Title", "Liam")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::provider(PROVIDER_NAME, format!("API error ({}): {}", status, body)));
        }

        let body = response.text().await?;
        let raw_response: Value = serde_json::from_str(&body)?;

        extract_text(&raw_response)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| AgentError::provider(PROVIDER_NAME, "response contained no text"))
    }
}

#[async_trait]
impl AnswerProvider for GenerativeClient {
    async fn ask(&self, prompt: &str) -> AgentResult<String> {
        debug!("Asking {} about '{}'", self.model, prompt);
        let messages = vec![
            ChatMessage::system(PERSONA_PREAMBLE),
            ChatMessage::user(format!("User question: {}", prompt)),
        ];
        self.complete(messages).await
    }
}

/// Provider used when no API key is configured; every call fails with a
/// configuration error.
#[derive(Debug, Clone)]
pub struct MissingCredential {
    env_var: String,
}

#[async_trait]
impl AnswerProvider for MissingCredential {
    async fn ask(&self, _prompt: &str) -> AgentResult<String> {
        Err(missing_key_error(&self.env_var))
    }
}

fn missing_key_error(env_var: &str) -> AgentError {
    AgentError::Config(format!(
        "API key not found. Please set the {} environment variable or run 'liam config --set-api-key YOUR_KEY'.",
        env_var
    ))
}

/// Build the configured provider, or one that reports the missing key
pub fn provider_from_config(config: &ProviderConfig) -> Arc<dyn AnswerProvider> {
    match GenerativeClient::from_config(config) {
        Ok(client) => Arc::new(client),
        Err(_) => Arc::new(MissingCredential {
            env_var: config.api_key_env.clone(),
        }),
    }
}

/// Pull the answer text out of a provider response.
///
/// Accepts `choices[0].message.content` (string or text parts),
/// `choices[0].text`, `candidates[0].content.parts[].text`, and top-level
/// `text` / `output_text`.
pub fn extract_text(response: &Value) -> Option<String> {
    let choice = response.get("choices").and_then(|c| c.get(0));

    if let Some(content) = choice.and_then(|c| c.get("message")).and_then(|m| m.get("content")) {
        match content {
            Value::String(s) => return Some(s.clone()),
            Value::Array(parts) => {
                if let Some(text) = join_text_parts(parts) {
                    return Some(text);
                }
            }
            _ => {}
        }
    }

    if let Some(text) = choice.and_then(|c| c.get("text")).and_then(Value::as_str) {
        return Some(text.to_string());
    }

    if let Some(parts) = response
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
    {
        if let Some(text) = join_text_parts(parts) {
            return Some(text);
        }
    }

    ["text", "output_text"]
        .iter()
        .find_map(|field| response.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

fn join_text_parts(parts: &[Value]) -> Option<String> {
    let texts: Vec<&str> = parts
        .iter()
        .filter(|part| part.get("type").map_or(true, |t| t == "text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join(""))
    }
}
