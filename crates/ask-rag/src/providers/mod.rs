//! Provider abstractions for embeddings and LLM generation
//!
//! Trait-based so the pipeline can switch between the hosted Gemini API and a
//! local Ollama server.

pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;

use std::sync::Arc;

use crate::config::{BackendProvider, RagConfig};
use crate::error::Result;

/// Embedding and generation providers for one backend
#[derive(Clone)]
pub struct Providers {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub llm: Arc<dyn LlmProvider>,
}

impl Providers {
    /// Build the providers for the configured backend
    pub async fn from_config(config: &RagConfig) -> Result<Self> {
        let providers = match config.backend {
            BackendProvider::Gemini => {
                tracing::info!("Using Gemini backend at {}", config.gemini.base_url);
                Self {
                    embedder: Arc::new(gemini::GeminiEmbedder::new(&config.gemini)?),
                    llm: Arc::new(gemini::GeminiClient::new(&config.gemini)?),
                }
            }
            BackendProvider::Ollama => {
                tracing::info!("Checking Ollama at {}...", config.ollama.base_url);
                let provider = ollama::OllamaProvider::new(&config.ollama)?;

                if provider.client().health_check().await {
                    tracing::info!("Ollama is running");
                } else {
                    tracing::warn!("Ollama not available at {}", config.ollama.base_url);
                    tracing::warn!(
                        "Start it with `ollama serve` and pull the models: ollama pull {} && ollama pull {}",
                        config.ollama.embed_model,
                        config.ollama.generate_model
                    );
                }

                let (embedder, llm) = provider.split();
                Self {
                    embedder: Arc::new(embedder),
                    llm: Arc::new(llm),
                }
            }
        };

        tracing::info!(
            "Providers initialized (embedding: {}/{}, llm: {}/{})",
            providers.embedder.name(),
            providers.embedder.model(),
            providers.llm.name(),
            providers.llm.model()
        );

        Ok(providers)
    }
}
