// src/services/chat_session.rs
use std::{
    fmt::Debug,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use reqwest::Client;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::message::{ChatRequest, ChatResponse, ConversationMessage, MessageRole};
use crate::services::action_registry::ActionRegistry;

pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    /// Unix milliseconds.
    pub timestamp: u64,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg-{}", Uuid::new_v4()),
            role,
            content: content.into(),
            timestamp: now_millis(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub is_open: bool,
    pub is_loading: bool,
}

/// Client side of the chat widget: visible conversation plus open/loading flags.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<RwLock<ChatState>>,
    http: Client,
    endpoint: String,
    actions: ActionRegistry,
}

impl Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("endpoint", &self.endpoint)
            .field("actions", &self.actions)
            .finish()
    }
}

impl ChatSession {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ChatState::default())),
            http,
            endpoint: endpoint.into(),
            actions: ActionRegistry::new(),
        }
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn register_action<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.register(name, handler);
    }

    pub async fn snapshot(&self) -> ChatState {
        self.inner.read().await.clone()
    }

    pub async fn open(&self) {
        self.inner.write().await.is_open = true;
    }

    pub async fn close(&self) {
        self.inner.write().await.is_open = false;
    }

    pub async fn toggle(&self) {
        let mut guard = self.inner.write().await;
        guard.is_open = !guard.is_open;
    }

    /// Drops the conversation and starts fresh. The open flag is kept.
    pub async fn new_conversation(&self) {
        let mut guard = self.inner.write().await;
        guard.messages.clear();
        guard.is_loading = false;
    }

    /// Sends `content` with the whole visible history and appends the reply.
    /// Failures never propagate; they become a friendly assistant message.
    pub async fn send_message(&self, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }

        let history = {
            let mut guard = self.inner.write().await;
            guard.messages.push(ChatMessage::new(MessageRole::User, content));
            guard.is_loading = true;
            guard
                .messages
                .iter()
                .map(|m| ConversationMessage::new(m.role, m.content.clone()))
                .collect::<Vec<_>>()
        };

        match self.request_reply(history).await {
            Ok(data) => {
                {
                    let mut guard = self.inner.write().await;
                    guard
                        .messages
                        .push(ChatMessage::new(MessageRole::Assistant, data.reply));
                    guard.is_loading = false;
                }
                if let Some(action) = data.action.as_deref() {
                    self.actions.dispatch(action);
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "chat error");
                let mut guard = self.inner.write().await;
                guard
                    .messages
                    .push(ChatMessage::new(MessageRole::Assistant, ERROR_REPLY));
                guard.is_loading = false;
            }
        }
    }

    async fn request_reply(
        &self,
        messages: Vec<ConversationMessage>,
    ) -> Result<ChatResponse, reqwest::Error> {
        self.http
            .post(&self.endpoint)
            .json(&ChatRequest { messages: Some(messages) })
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
