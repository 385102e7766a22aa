//! Route definitions for the Arkiv HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(file_routes())
        .merge(folder_routes())
        .merge(share_routes())
        .merge(permission_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Account endpoints: register, login, me.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// Tree browsing, upload, download, delete.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::browse))
        .route("/files/upload", post(handlers::file::upload))
        .route("/files/{id}/download", get(handlers::file::download))
        .route("/files/{id}", delete(handlers::file::delete))
}

/// Folder creation.
fn folder_routes() -> Router<AppState> {
    Router::new().route("/folders", post(handlers::folder::create_folder))
}

/// Per-file share listing and grants.
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/files/{id}/shares", get(handlers::share::list_shares))
        .route("/files/{id}/shares", post(handlers::share::grant_shares))
}

/// Permission lookup.
fn permission_routes() -> Router<AppState> {
    Router::new().route("/permissions", get(handlers::permission::list_permissions))
}

/// Health check.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// CORS layer from configuration; `*` means any origin.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors.allowed_origins;
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<axum::http::HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
