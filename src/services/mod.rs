pub mod action_registry;
pub mod chat_session;
pub mod chatbot;
pub mod inference;
