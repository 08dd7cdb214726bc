//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::rag::RagChain;

/// Shared application state
///
/// The index is read-only once built, so requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Question answering chain over the built index
    chain: Arc<RagChain>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: RagConfig, chain: Arc<RagChain>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, chain }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the RAG chain
    pub fn chain(&self) -> &Arc<RagChain> {
        &self.inner.chain
    }
}
