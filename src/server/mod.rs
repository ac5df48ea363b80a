//! HTTP surface the marketplace calls for geodata.
//!
//! Thin wrapper over [`crate::geo::GeoResolver`]: every endpoint returns
//! plain data or an empty result, never a retry/rate-limit detail.

mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::geo::GeoResolver;

pub fn build_router(resolver: Arc<GeoResolver>) -> Router {
    let state = Arc::new(AppState { resolver });

    Router::new()
        .route("/api/counties", get(handlers::counties))
        .route("/api/bounds", get(handlers::county_bounds))
        .route("/api/towns", get(handlers::towns))
        .route("/api/search", get(handlers::search))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16) {
    let app = build_router(Arc::new(GeoResolver::new()));
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  Eirelocate geodata server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    });
}
