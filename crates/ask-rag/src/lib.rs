//! ask-rag: question answering over a folder of text files
//!
//! At startup every `.txt` file in the data directory is split into
//! overlapping chunks, embedded and held in an in-memory index. `POST /ask`
//! retrieves the closest chunks for a question and has an LLM answer from
//! them, returning the answer together with the source file names.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod rag;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use rag::RagChain;
pub use types::{
    document::{Chunk, ChunkSource, Document},
    query::AskRequest,
    response::AskResponse,
};
