//! Local JSON backend for an explorer front-end.

mod handlers;
mod state;

pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/artworks", get(handlers::artworks))
        .route("/api/artworks/{id}", get(handlers::artwork_detail))
        .route("/api/artworks/{id}/pins", get(handlers::artwork_pins))
        .route("/api/refresh", post(handlers::refresh))
        .route("/api/filters", get(handlers::get_filters).post(handlers::update_filters))
        .route("/api/filters/apply", post(handlers::apply_filters))
        .route("/api/cultures", get(handlers::cultures))
        .route("/api/geocode", get(handlers::geocode))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the explorer, bind, and serve until the process is stopped.
pub async fn start(host: &str, port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    state.explorer.start();
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Art Explorer backend listening on http://{}", addr);
    axum::serve(listener, app).await
}
