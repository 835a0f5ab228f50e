// src/api/mod.rs — HTTP generation endpoint

pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::protocol::Generator;
use crate::infra::config::ServerConfig;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub generator: Arc<Generator>,
}

/// Build the axum router with all routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Start the API server (blocking).
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);

    let router = build_router(state);

    tracing::info!("generation service listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
