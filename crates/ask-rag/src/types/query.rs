//! Ask request type

use serde::{Deserialize, Serialize};

/// Body of `POST /ask`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer; absent and null are both accepted here and
    /// rejected later as a missing question
    #[serde(default)]
    pub question: Option<String>,
}

impl AskRequest {
    /// Create a request for a question
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
        }
    }

    /// The question, unless it is absent, null or empty
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref().filter(|q| !q.is_empty())
    }
}
