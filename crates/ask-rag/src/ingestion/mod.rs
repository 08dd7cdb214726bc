//! Document ingestion: loading, chunking and index building

mod builder;
mod chunker;
mod loader;

pub use builder::IndexBuilder;
pub use chunker::{TextChunker, TextSpan};
pub use loader::DocumentLoader;
