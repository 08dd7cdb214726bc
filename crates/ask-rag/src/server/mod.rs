//! HTTP server for the RAG system

pub mod routes;
pub mod state;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::rag::RagChain;
use state::AppState;

/// RAG HTTP Server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a server around a ready chain
    pub fn new(config: RagConfig, chain: RagChain) -> Self {
        let state = AppState::new(config.clone(), Arc::new(chain));
        Self { config, state }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let router = routes::routes()
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            // CORS must be the outermost layer
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let address = self.address();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind {}: {}", address, e)))?;

        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!("Starting RAG server on http://{}", addr);

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}
