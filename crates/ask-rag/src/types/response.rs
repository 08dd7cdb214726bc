//! Response types for ask queries

use serde::{Deserialize, Serialize};

/// Successful answer to a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer text
    pub answer: String,
    /// Source file name of every chunk used as context, in rank order
    pub sources: Vec<String>,
}

impl AskResponse {
    /// Create a new response
    pub fn new(answer: String, sources: Vec<String>) -> Self {
        Self { answer, sources }
    }
}
