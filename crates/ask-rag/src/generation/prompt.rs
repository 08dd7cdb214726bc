//! Prompt templates for RAG generation

use crate::error::{Error, Result};
use crate::retrieval::SearchResult;

/// Default prompt: a supportive chatbot that is explicit about not being a therapist
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are a therapy chatbot. Not a real therapist.

Context:
{context}

Question: {question}

Answer:";

/// Separator between stuffed chunks
const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Prompt template with `{context}` and `{question}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template, checking both placeholders are present
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for placeholder in ["{context}", "{question}"] {
            if !template.contains(placeholder) {
                return Err(Error::Config(format!(
                    "Prompt template is missing the {} placeholder",
                    placeholder
                )));
            }
        }
        Ok(Self { template })
    }

    /// Fill in the template.
    ///
    /// Substitution is single-pass, so braces inside the context or the
    /// question are never treated as placeholders.
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            if let Some(after) = tail.strip_prefix("{context}") {
                out.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{question}") {
                out.push_str(question);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);

        out
    }

    /// Raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

/// Stuff retrieved chunks into a single context block
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}
