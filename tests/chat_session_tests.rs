mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use portfolio_backend::config::Config;
use portfolio_backend::message::MessageRole;
use portfolio_backend::routes::create_router;
use portfolio_backend::services::chat_session::{ChatSession, ERROR_REPLY};
use portfolio_backend::state::AppState;

use common::{Script, spawn_app, spawn_upstream};

async fn session_against(scripts: &[(&str, Script)], models: &[&str]) -> (ChatSession, common::MockUpstream) {
    let upstream = spawn_upstream(scripts).await;
    let config = Config::default()
        .with_api_key("test-key")
        .with_api_url(&upstream.url)
        .with_models(models.iter().copied());
    let base = spawn_app(create_router().with_state(Arc::new(AppState::new(config)))).await;
    let session = ChatSession::new(reqwest::Client::new(), format!("{base}/api/chat"));
    (session, upstream)
}

#[tokio::test]
async fn reply_is_appended_and_action_dispatched() {
    let (session, upstream) = session_against(
        &[("alpha", Script::Reply("Taking you there. [ACTION:scrollToProjects]"))],
        &["alpha"],
    )
    .await;

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    session.register_action("scrollToProjects", move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    session.send_message("show me your projects").await;

    let state = session.snapshot().await;
    assert!(!state.is_loading);
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].role, MessageRole::Assistant);
    assert_eq!(state.messages[1].content, "Taking you there.");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.calls().len(), 1);
}

#[tokio::test]
async fn whole_visible_history_is_sent() {
    let (session, upstream) =
        session_against(&[("alpha", Script::Reply("sure"))], &["alpha"]).await;

    session.send_message("first").await;
    session.send_message("second").await;

    let calls = upstream.calls();
    assert_eq!(calls.len(), 2);
    let sent = calls[1].body["messages"].as_array().unwrap();
    // system + user + assistant + user
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[1]["content"], "first");
    assert_eq!(sent[2]["content"], "sure");
    assert_eq!(sent[3]["content"], "second");
}

#[tokio::test]
async fn unavailable_service_becomes_friendly_message() {
    let (session, upstream) =
        session_against(&[("alpha", Script::Status(429, ""))], &["alpha"]).await;

    session.send_message("anyone there?").await;

    let state = session.snapshot().await;
    assert!(!state.is_loading);
    assert_eq!(state.messages.last().unwrap().content, ERROR_REPLY);
    assert_eq!(upstream.calls().len(), 1);
}

#[tokio::test]
async fn unknown_action_is_ignored() {
    let (session, _upstream) = session_against(
        &[("alpha", Script::Reply("Boom [ACTION:launchRockets]"))],
        &["alpha"],
    )
    .await;

    session.send_message("do something").await;

    let state = session.snapshot().await;
    assert_eq!(state.messages.last().unwrap().content, "Boom");
}
