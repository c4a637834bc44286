//! HTTP API server for vidocs.

pub mod api_error;
mod api_types;
mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use vidocs_service::{ChatService, DocumentationService};
use vidocs_storage::SessionStore;

pub use api_types::{AnalyzeResponse, ChatRequest, ChatResponse, HistoryItem, StatusResponse};

/// Screen recordings are large; the default multipart body limit is far
/// too small for them.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Documentation flow orchestrator.
    pub docs: DocumentationService,
    /// Chat flow orchestrator.
    pub chat: ChatService,
    /// Session store, read directly by the history handlers.
    pub store: SessionStore,
}

pub fn create_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "skipping invalid allowed origin");
                None
            },
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/analyze", post(handlers::analyze))
        .route("/history", get(handlers::history))
        .route("/history/{id}", get(handlers::get_session))
        .route("/chat", post(handlers::chat))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}
