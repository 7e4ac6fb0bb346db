// Server module - builds the HTTP app and runs it

use axum::http::{HeaderValue, Method};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::Config;
use super::{db, AppState};
use crate::api;

/// Build the API router. CORS is limited to `frontend_url` when it parses.
pub fn build_router(state: AppState, frontend_url: &str) -> Router {
    let api_router = api::api_router(state);

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", frontend_url, e),
    }

    Router::new()
        .nest("/api", api_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Open the database, bind and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<(), String> {
    let db = db::init_db(&config.database_url)
        .await
        .map_err(|e| format!("Failed to initialize database: {}", e))?;

    if config.passcode.is_none() {
        tracing::warn!("BOOKLIST_PASSCODE is not set; every passcode will be rejected");
    }

    let app = build_router(AppState::from_config(db, &config), &config.frontend_url);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Booklist API listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("HTTP server error: {}", e))
}
