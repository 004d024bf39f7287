// src/config.rs
use std::env;

use crate::services::chatbot::MODELS;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Process configuration. Immutable once the server is running.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the inference backend. `None` means the chat
    /// endpoint answers 500 until one is configured.
    pub api_key: Option<String>,
    pub api_url: String,
    pub bind_addr: String,
    /// Candidate models, highest preference first.
    pub models: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: DEFAULT_BIND.to_string(),
            models: MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Config {
    /// Reads `CHATBOT_API_KEY`, `CHATBOT_API_URL` and `CHATBOT_BIND`.
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_blank(env::var("CHATBOT_API_KEY").ok()),
            api_url: non_blank(env::var("CHATBOT_API_URL").ok()).unwrap_or(defaults.api_url),
            bind_addr: non_blank(env::var("CHATBOT_BIND").ok()).unwrap_or(defaults.bind_addr),
            models: defaults.models,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = non_blank(Some(key.into()));
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
