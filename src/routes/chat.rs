use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, MessageRole},
    services::chatbot::generate_reply,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // Credential check comes first so a misconfigured server never calls out.
    let client = state.inference().ok_or(AppError::NotConfigured)?;

    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected chat body");
        AppError::BadRequest("Messages array is required".to_string())
    })?;

    // An empty list is accepted: the system prompt alone goes through the cascade.
    let messages = payload
        .messages
        .ok_or_else(|| AppError::BadRequest("Messages array is required".to_string()))?;

    if messages.iter().any(|m| m.role == MessageRole::System) {
        return Err(AppError::BadRequest(
            "Message role must be user or assistant".to_string(),
        ));
    }

    let reply = generate_reply(&client, &state.config.models, &messages).await?;

    Ok(Json(ChatResponse {
        reply: reply.cleaned_text,
        action: reply.action,
        model: reply.model_used,
    }))
}
