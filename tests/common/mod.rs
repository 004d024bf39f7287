#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};

/// What the fake backend answers for one model.
#[derive(Clone)]
pub enum Script {
    Reply(&'static str),
    Status(u16, &'static str),
}

#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub model: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct MockState {
    scripts: Arc<HashMap<String, Script>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

pub struct MockUpstream {
    pub url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockUpstream {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn models_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }
}

async fn completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.calls.lock().unwrap().push(RecordedCall {
        model: model.clone(),
        authorization,
        body,
    });

    match state.scripts.get(&model) {
        Some(Script::Reply(text)) => Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }]
        }))
        .into_response(),
        Some(Script::Status(code, text)) => {
            (StatusCode::from_u16(*code).unwrap(), text.to_string()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "model not found").into_response(),
    }
}

/// Serves a fake chat-completion endpoint on an ephemeral local port.
pub async fn spawn_upstream(scripts: &[(&str, Script)]) -> MockUpstream {
    let state = MockState {
        scripts: Arc::new(
            scripts
                .iter()
                .map(|(m, s)| (m.to_string(), s.clone()))
                .collect(),
        ),
        calls: Arc::default(),
    };
    let calls = state.calls.clone();

    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        url: format!("http://{addr}/v1/chat/completions"),
        calls,
    }
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
