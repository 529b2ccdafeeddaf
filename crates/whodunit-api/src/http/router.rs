//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing. When a `public/` directory exists
//! (configurable via `WHODUNIT_WEB_DIR`), the browser front end is served
//! from it; the API routes take priority and unknown paths fall through to
//! the static files. Without the directory, only the API is served.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/final-deduction", post(handlers::deduction::final_deduction))
        .route("/api/", post(handlers::generate::generate))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Serve the browser front end from disk if the directory exists.
    let web_dir = std::env::var("WHODUNIT_WEB_DIR").unwrap_or_else(|_| "public".to_string());
    if std::path::Path::new(&web_dir).exists() {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "static front-end serving enabled");
    }

    router
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
