// rest/mod.rs — Config persistence endpoint.
//
// Axum HTTP server, local only by default. One unguarded file overwrite —
// no auth, no versioning, no partial-write protection. The browser
// start-page posts from another origin, hence the permissive CORS layer.
//
// Endpoints:
//   GET  /api/v1/health
//   GET  /api/v1/config
//   POST /api/v1/config

pub mod routes;

use anyhow::Result;
use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Settings;

/// Shared state for the REST handlers.
pub struct AppState {
    pub settings: Arc<Settings>,
    pub started_at: Instant,
}

pub async fn serve(settings: Arc<Settings>) -> Result<()> {
    let bind = format!("{}:{}", settings.bind_address, settings.port);
    let addr: SocketAddr = bind.parse()?;

    let state = Arc::new(AppState {
        settings,
        started_at: Instant::now(),
    });
    let router = build_router(state);

    info!("config endpoint listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health))
        .route(
            "/api/v1/config",
            get(routes::get_config).post(routes::save_config),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
