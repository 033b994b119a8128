//! API layer - HTTP handlers and routing
//!
//! Routes:
//! - `GET /` liveness
//! - `GET /test` datastore check
//! - `GET /courses`, `GET /blogs` static catalog
//! - `POST /contact` contact form submission

pub mod catalog;
pub mod contact;
pub mod health;
pub mod middleware;
pub mod responses;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use middleware::{cors_layer, ApiError, AppState};

/// Build the API routes without middleware
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/test", get(health::test_db))
        .route("/courses", get(catalog::list_courses))
        .route("/blogs", get(catalog::list_blogs))
        .route("/contact", post(contact::submit_contact))
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, server: &ServerConfig) -> Result<Router> {
    Ok(build_api_router()
        .layer(cors_layer(&server.cors_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
