//! MAXbuddy request board.
//!
//! An axum service persisting contact requests and users to a JSON document, plus the
//! headless state model of the board's browser client.

pub mod api;
pub mod board;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;

use axum::{
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // The board UI is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/requests",
            get(api::list_requests).post(api::create_request),
        )
        .route("/requests/{id}", delete(api::delete_request))
        .route("/users", get(api::list_users));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
