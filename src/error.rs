// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Chatbot is not configured")]
    NotConfigured,

    #[error("{0}")]
    BadRequest(String),

    /// Every candidate model failed. `last_error` is for the server log only.
    #[error("All AI models are currently unavailable. Please try again later.")]
    ServiceUnavailable { last_error: Option<String> },

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotConfigured => {
                tracing::error!("CHATBOT_API_KEY is not configured");
                self.to_string()
            }
            AppError::ServiceUnavailable { last_error } => {
                tracing::error!(last_error = ?last_error, "all models exhausted");
                self.to_string()
            }
            AppError::Upstream(err) => {
                tracing::error!(error = %err, "chat API error");
                "Failed to process chat request".to_string()
            }
            AppError::BadRequest(_) => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
