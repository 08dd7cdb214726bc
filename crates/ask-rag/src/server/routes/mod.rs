//! Routes for the RAG server

pub mod ask;
pub mod info;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask))
        .route("/health", get(health_check))
        .route("/info", get(info::info))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
