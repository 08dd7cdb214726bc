//! Document and chunk types with source tracking

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A source file that has been loaded for indexing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// File name without directory (reported as the source)
    pub filename: String,
    /// Full path the file was read from
    pub path: PathBuf,
    /// SHA-256 of the file content
    pub content_hash: String,
    /// File size in bytes
    pub file_size: u64,
    /// Total number of chunks created
    pub total_chunks: u32,
    /// Text content
    #[serde(skip)]
    pub content: String,
}

impl Document {
    /// Create a document from a file path and its text
    pub fn new(path: &Path, content: String) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self {
            id: Uuid::new_v4(),
            filename,
            path: path.to_path_buf(),
            content_hash: content_hash(&content),
            file_size: content.len() as u64,
            total_chunks: 0,
            content,
        }
    }
}

/// Hex-encoded SHA-256 of a text
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Source information for a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// File name reported in answers
    pub filename: String,
    /// Full path of the source file
    pub path: PathBuf,
}

impl ChunkSource {
    /// Source info for a chunk of `doc`
    pub fn from_document(doc: &Document) -> Self {
        Self {
            filename: doc.filename.clone(),
            path: doc.path.clone(),
        }
    }
}

/// A chunk of text from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Source information
    pub source: ChunkSource,
    /// Character position in original document
    pub char_start: usize,
    pub char_end: usize,
    /// Chunk index within document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk without an embedding
    pub fn new(
        document_id: Uuid,
        content: String,
        source: ChunkSource,
        char_start: usize,
        char_end: usize,
        chunk_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            embedding: Vec::new(),
            source,
            char_start,
            char_end,
            chunk_index,
        }
    }

    /// Attach an embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}
