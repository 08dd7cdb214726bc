//! Exact nearest-neighbour index held in memory

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (-1.0 to 1.0, higher is better)
    pub similarity: f32,
}

/// Read-only vector index built once at startup
#[derive(Debug, Clone)]
pub struct VectorIndex {
    documents: Vec<Document>,
    chunks: Vec<Chunk>,
    dimensions: usize,
}

impl VectorIndex {
    /// Create an index from embedded chunks.
    ///
    /// Every chunk must carry an embedding and all embeddings must have the
    /// same dimensionality.
    pub fn new(documents: Vec<Document>, chunks: Vec<Chunk>) -> Result<Self> {
        let dimensions = chunks.first().map(|c| c.embedding.len()).unwrap_or(0);

        for chunk in &chunks {
            if chunk.embedding.is_empty() {
                return Err(Error::index(format!(
                    "Chunk {} of {} has no embedding",
                    chunk.chunk_index, chunk.source.filename
                )));
            }
            if chunk.embedding.len() != dimensions {
                return Err(Error::index(format!(
                    "Chunk {} of {} has {} dimensions, expected {}",
                    chunk.chunk_index,
                    chunk.source.filename,
                    chunk.embedding.len(),
                    dimensions
                )));
            }
        }

        Ok(Self {
            documents,
            chunks,
            dimensions,
        })
    }

    /// Top `top_k` chunks by cosine similarity, best first
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if self.chunks.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if query_embedding.len() != self.dimensions {
            return Err(Error::index(format!(
                "Query has {} dimensions, index has {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| (i, cosine_similarity(query_embedding, &chunk.embedding)))
            .collect();

        // Descending, NaN last
        scored.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
        });
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(i, similarity)| SearchResult {
                chunk: self.chunks[i].clone(),
                similarity,
            })
            .collect())
    }

    /// Get chunk count
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embedding dimensions
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Documents the index was built from
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Distinct source file names present in the index
    pub fn source_names(&self) -> BTreeSet<String> {
        self.chunks
            .iter()
            .map(|c| c.source.filename.clone())
            .collect()
    }
}

/// Cosine similarity; 0.0 when either vector has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
