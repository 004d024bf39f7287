// src/services/inference.rs
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::message::ConversationMessage;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 500;

/// Outcome of a single candidate call. Transport failures are returned as `Err`
/// by [`InferenceClient::complete`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Reply(String),
    RateLimited,
    Failed { status: u16, body: String },
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Thin client for an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: Client,
    url: String,
    api_key: String,
}

impl InferenceClient {
    pub fn new(http: Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn complete(
        &self,
        model: &str,
        messages: &[ConversationMessage],
    ) -> Result<Attempt, reqwest::Error> {
        let body = CompletionRequest {
            model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(Attempt::Failed { status: status.as_u16(), body });
        }

        let data: CompletionResponse = response.json().await?;
        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        Ok(Attempt::Reply(content))
    }
}
