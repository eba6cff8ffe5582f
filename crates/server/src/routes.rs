//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_body_size;

    Router::new()
        .route(
            "/",
            get(handlers::index).post(handlers::create_archive),
        )
        .route("/download_page/{filename}", get(handlers::download_page))
        .route("/download/{filename}", get(handlers::download_file))
        // The request body ceiling the archive pipeline relies on: oversized
        // uploads are rejected at the boundary before any staging I/O.
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
