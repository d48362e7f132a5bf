//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS,
//! and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (composition wizard)
/// - REST API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // Directory + bank
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/courses", get(http::http_list_courses))
        .route("/api/v1/subjects", get(http::http_list_subjects))
        .route("/api/v1/questions", get(http::http_list_questions))
        .route(
            "/api/v1/curriculum-materials/subject/:subject_id",
            get(http::http_list_materials),
        )
        // Evaluations + review workflow
        .route(
            "/api/v1/evaluations",
            get(http::http_list_evaluations).post(http::http_create_evaluation),
        )
        .route(
            "/api/v1/evaluations/:id",
            get(http::http_get_evaluation)
                .put(http::http_update_evaluation)
                .delete(http::http_delete_evaluation),
        )
        .route("/api/v1/evaluations/:id/submit", post(http::http_submit_evaluation))
        .route("/api/v1/evaluations/:id/review", post(http::http_review_evaluation))
        .route("/api/v1/evaluations/:id/audit", get(http::http_evaluation_audit))
        // Wizard helpers
        .route("/api/v1/difficulty", post(http::http_difficulty))
        .route("/api/v1/notifications", get(http::http_list_notifications))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
