//! Prompt construction for answer generation

pub mod prompt;

pub use prompt::{build_context, PromptTemplate, DEFAULT_PROMPT_TEMPLATE};
