//! Retrieval-augmented question answering over the built index

use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::{build_context, PromptTemplate};
use crate::providers::{EmbeddingProvider, LlmProvider, Providers};
use crate::retrieval::VectorIndex;
use crate::types::AskResponse;

/// Embed → search → stuff → generate
pub struct RagChain {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    index: VectorIndex,
    prompt: PromptTemplate,
    top_k: usize,
}

impl RagChain {
    /// Create a chain over a built index
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: VectorIndex,
        prompt: PromptTemplate,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            llm,
            index,
            prompt,
            top_k,
        }
    }

    /// Create a chain from configuration and providers
    pub fn from_config(config: &RagConfig, providers: Providers, index: VectorIndex) -> Result<Self> {
        Ok(Self::new(
            providers.embedder,
            providers.llm,
            index,
            PromptTemplate::new(config.prompt.template.as_str())?,
            config.retrieval.top_k,
        ))
    }

    /// Answer a question with the retrieved chunks as context.
    ///
    /// An empty question is rejected. Failures from the
    /// embedding or LLM provider are returned as-is.
    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        if question.is_empty() {
            return Err(Error::MissingQuestion);
        }

        let start = Instant::now();

        let query_embedding = self.embedder.embed_query(question).await?;
        let results = self.index.search(&query_embedding, self.top_k)?;

        tracing::debug!(
            "Retrieved {} chunks (best similarity: {:.3})",
            results.len(),
            results.first().map(|r| r.similarity).unwrap_or(0.0)
        );

        let context = build_context(&results);
        let prompt = self.prompt.render(&context, question);
        let answer = self.llm.generate(&prompt).await?;

        let sources = results
            .into_iter()
            .map(|r| r.chunk.source.filename)
            .collect();

        tracing::info!("Answered in {}ms", start.elapsed().as_millis());

        Ok(AskResponse::new(answer, sources))
    }

    /// The index being searched
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Embedding provider in use
    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }

    /// LLM provider in use
    pub fn llm(&self) -> &dyn LlmProvider {
        self.llm.as_ref()
    }

    /// Chunks retrieved per question
    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
