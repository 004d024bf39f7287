// src/services/chatbot.rs
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::AppError;
use crate::message::ConversationMessage;
use crate::services::inference::{Attempt, InferenceClient};

/// Ranked best first. Each model has its own rate limit, so a 429 on one
/// usually leaves the next one available.
pub const MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "meta-llama/llama-4-scout-17b-16e-instruct",
    "openai/gpt-oss-120b",
    "qwen/qwen3-32b",
    "llama-3.1-8b-instant",
];

/// Most recent messages forwarded upstream. The system prompt is extra.
pub const MAX_HISTORY: usize = 40;

pub const EMPTY_REPLY: &str = "Sorry, I could not generate a response.";

pub const SYSTEM_PROMPT: &str = "\
You are PrawnKing, the assistant on a developer's portfolio website.

CONTEXT:
- The site showcases the developer's projects and skills
- Sections: Home, About, Projects, Contact
- Theme: cyberpunk terminal look with neon colours
- The background is a drawing canvas: visitors can switch on pen mode and draw on the grid

RULES:
- Reply in the visitor's language
- Be friendly and factual; never invent details that are not on the site
- If you do not know something, say so
- Keep answers to two or three complete sentences
- Suggest the drawing feature when the conversation is light

ACTIONS:
When the visitor explicitly asks to navigate, add exactly one directive to your reply:
[ACTION:action_name]

Available actions:
- scrollToHome
- scrollToAbout
- scrollToProjects
- scrollToContact";

static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[ACTION:\s*(\w+)\]").expect("action pattern is valid"));

/// Successful cascade result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub cleaned_text: String,
    pub action: Option<String>,
    pub model_used: String,
}

/// Keeps the last `MAX_HISTORY` messages in their original order.
pub fn trim_history(history: &[ConversationMessage]) -> &[ConversationMessage] {
    let start = history.len().saturating_sub(MAX_HISTORY);
    &history[start..]
}

/// System prompt followed by the trimmed history.
pub fn build_messages(history: &[ConversationMessage]) -> Vec<ConversationMessage> {
    let trimmed = trim_history(history);
    let mut messages = Vec::with_capacity(trimmed.len() + 1);
    messages.push(ConversationMessage::system(SYSTEM_PROMPT));
    messages.extend_from_slice(trimmed);
    messages
}

/// Splits a generated reply into display text and an optional action name.
/// If several directives were emitted the last one is used and all are removed.
pub fn extract_action(reply: &str) -> (String, Option<String>) {
    let action = ACTION_RE
        .captures_iter(reply)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    let cleaned = ACTION_RE.replace_all(reply, "").trim().to_string();
    (cleaned, action)
}

/// Tries each candidate in order and returns the first successful reply.
pub async fn generate_reply(
    client: &InferenceClient,
    models: &[String],
    history: &[ConversationMessage],
) -> Result<ChatReply, AppError> {
    let messages = build_messages(history);
    let mut last_error: Option<String> = None;

    for model in models {
        match client.complete(model, &messages).await? {
            Attempt::RateLimited => {
                info!(%model, "model rate limited, trying next");
                last_error = Some(format!("Rate limited on {model}"));
            }
            Attempt::Failed { status, body } => {
                warn!(%model, status, error = %body, "model error");
                last_error = Some(body);
            }
            Attempt::Reply(text) => {
                let text = if text.is_empty() {
                    EMPTY_REPLY.to_string()
                } else {
                    text
                };
                let (cleaned_text, action) = extract_action(&text);
                info!(%model, action = ?action, "response from model");
                return Ok(ChatReply {
                    cleaned_text,
                    action,
                    model_used: model.clone(),
                });
            }
        }
    }

    Err(AppError::ServiceUnavailable { last_error })
}
