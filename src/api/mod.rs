//! HTTP surface: JSON analysis, file upload, health, self-test.

mod routes;

pub use routes::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::InputLimits;
use crate::pipeline::EmailAnalyzer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<EmailAnalyzer>,
    pub limits: InputLimits,
    /// Body cap for `/api/upload`.
    pub max_upload_bytes: usize,
}

/// Build the Axum router with every API route.
pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/analyze", post(routes::analyze))
        .route("/api/upload", post(routes::upload).layer(upload_limit))
        .route("/api/test", get(routes::self_test))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
