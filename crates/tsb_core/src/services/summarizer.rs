//! Summarization client for an OpenAI-compatible chat endpoint.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::{Summarizer, SummaryError};

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Blocking client for chat-completions summarization.
pub struct OpenAiSummarizer {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiSummarizer {
    /// Create a client for the given API base URL, credential, and model.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

impl Summarizer for OpenAiSummarizer {
    fn summarize(&self, system_prompt: &str, transcript: &str) -> Result<String, SummaryError> {
        let url = format!("{}/chat/completions", self.base_url);

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": transcript },
            ],
        });

        tracing::debug!(
            "Summarizing {} chars with model {}",
            transcript.len(),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| SummaryError::Service(format!("request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SummaryError::Service(format!("status {}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| SummaryError::Service(format!("body: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(SummaryError::EmptyResponse);
        }

        Ok(trimmed.to_string())
    }
}
