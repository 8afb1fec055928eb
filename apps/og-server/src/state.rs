//! Shared application state and router

use std::sync::Arc;

use axum::{routing::get, Router};
use og_render::PreviewRenderer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{handle_health, handle_post_image, handle_preview_page};
use crate::store::PostStore;

/// Primary title for previews requested without one
pub const DEFAULT_TITLE: &str = "Arafat's Tech";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub renderer: PreviewRenderer,
    pub posts: PostStore,
    pub default_title: Arc<str>,
    /// Render timeout in milliseconds
    pub timeout_ms: u64,
}

/// All routes with tracing and CORS; rate limiting is added by `main`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        // Interactive preview page
        .route("/ai", get(handle_preview_page))
        // Static preview asset, `:file` is `{slug}.png`
        .route("/og/app/:file", get(handle_post_image))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
