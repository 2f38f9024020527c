//! Route definitions for the comic-shelf HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(collection_routes())
        .merge(comic_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Collection CRUD, tree operations and ingestion
fn collection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/collections",
            get(handlers::collection::list_collections)
                .post(handlers::collection::create_collection),
        )
        .route("/collections/tree", get(handlers::collection::get_tree))
        .route(
            "/collections/upload-structure",
            post(handlers::collection::upload_structure),
        )
        .route(
            "/collections/{id}",
            get(handlers::collection::get_collection)
                .patch(handlers::collection::update_collection)
                .delete(handlers::collection::delete_collection),
        )
        .route(
            "/collections/{id}/detail",
            get(handlers::collection::get_collection_detail),
        )
        .route(
            "/collections/{id}/mark-read",
            patch(handlers::collection::mark_read),
        )
}

/// Comic CRUD, read toggling and stats
fn comic_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comics",
            get(handlers::comic::list_comics).post(handlers::comic::create_comic),
        )
        .route("/comics/stats", get(handlers::comic::reading_stats))
        .route(
            "/comics/{id}",
            get(handlers::comic::get_comic)
                .patch(handlers::comic::update_comic)
                .delete(handlers::comic::delete_comic),
        )
        .route(
            "/comics/{id}/toggle-read",
            patch(handlers::comic::toggle_read),
        )
}
