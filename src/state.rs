// src/state.rs
use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::services::inference::InferenceClient;

pub type SharedState = Arc<AppState>;

/// Immutable per-process state shared by every request.
pub struct AppState {
    pub config: Config,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// `None` when no backend credential is configured.
    pub fn inference(&self) -> Option<InferenceClient> {
        let key = self.config.api_key.as_deref()?;
        Some(InferenceClient::new(
            self.http.clone(),
            self.config.api_url.clone(),
            key,
        ))
    }
}
