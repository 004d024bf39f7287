use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use portfolio_backend::{config::Config, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    if config.api_key.is_none() {
        tracing::warn!("CHATBOT_API_KEY is not set; /api/chat will answer 500");
    }
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    let cors = CorsLayer::very_permissive();

    let app = routes::create_router().with_state(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("portfolio backend running at http://{bind_addr}");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
