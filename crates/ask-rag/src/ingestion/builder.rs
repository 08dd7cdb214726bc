//! One-shot index build: load → chunk → embed → index

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::VectorIndex;

use super::chunker::TextChunker;
use super::loader::DocumentLoader;

/// Builds the in-memory index from the data directory
pub struct IndexBuilder {
    data_dir: PathBuf,
    loader: DocumentLoader,
    chunker: TextChunker,
}

impl IndexBuilder {
    /// Create a builder for a directory
    pub fn new(data_dir: impl Into<PathBuf>, chunker: TextChunker) -> Self {
        Self {
            data_dir: data_dir.into(),
            loader: DocumentLoader::default(),
            chunker,
        }
    }

    /// Create a builder from configuration
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            data_dir: config.data.dir.clone(),
            loader: DocumentLoader::new(config.data.extension.as_str()),
            chunker: TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap),
        }
    }

    /// Directory being indexed
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load, chunk and embed every document, then build the index
    pub async fn build(&self, embedder: &dyn EmbeddingProvider) -> Result<VectorIndex> {
        let start = Instant::now();

        let mut documents = self.loader.load_dir(&self.data_dir)?;

        let mut chunks = Vec::new();
        for doc in &mut documents {
            let doc_chunks = self.chunker.chunk_document(doc);
            doc.total_chunks = doc_chunks.len() as u32;
            tracing::debug!("{}: {} chunks", doc.filename, doc_chunks.len());
            chunks.extend(doc_chunks);
        }

        if chunks.is_empty() {
            return Err(Error::EmptyIndex(self.data_dir.clone()));
        }

        tracing::info!(
            "Embedding {} chunks from {} documents with {}",
            chunks.len(),
            documents.len(),
            embedder.model()
        );

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_documents(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let chunks = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| chunk.with_embedding(embedding))
            .collect();

        let index = VectorIndex::new(documents, chunks)?;

        tracing::info!(
            "Index built in {}ms: {} chunks, {} dimensions",
            start.elapsed().as_millis(),
            index.len(),
            index.dimensions()
        );

        Ok(index)
    }
}
