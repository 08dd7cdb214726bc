//! In-memory retrieval over embedded chunks

mod index;

pub use index::{cosine_similarity, SearchResult, VectorIndex};
