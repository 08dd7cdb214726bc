//! Gemini embedding provider using embedding-001

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{model_resource, GeminiApi};
use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;

/// Gemini embedding provider
pub struct GeminiEmbedder {
    api: GeminiApi,
    model: String,
    batch_size: usize,
}

impl GeminiEmbedder {
    /// Create a new Gemini embedder from config
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            api: GeminiApi::new(config)?,
            model: model_resource(&config.embedding_model),
            batch_size: config.embed_batch_size.max(1),
        })
    }

    fn request<'a>(&'a self, text: &'a str, task_type: TaskType) -> EmbedRequest<'a> {
        EmbedRequest {
            model: &self.model,
            content: Content {
                parts: vec![Part { text }],
            },
            task_type,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TaskType {
    RetrievalQuery,
    RetrievalDocument,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: TaskType,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.api.endpoint(&self.model, "embedContent");
        let request = self.request(text, TaskType::RetrievalQuery);

        let response: EmbedResponse = self.api.post(&url, &request, Error::Embedding).await?;

        if response.embedding.values.is_empty() {
            return Err(Error::embedding("No embedding in Gemini response"));
        }
        Ok(response.embedding.values)
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.api.endpoint(&self.model, "batchEmbedContents");
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let request = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|t| self.request(t, TaskType::RetrievalDocument))
                    .collect(),
            };

            let response: BatchEmbedResponse =
                self.api.post(&url, &request, Error::Embedding).await?;

            if response.embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "Gemini returned {} embeddings for {} texts",
                    response.embeddings.len(),
                    batch.len()
                )));
            }

            all_embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
            tracing::debug!("Embedded {}/{} chunks", all_embeddings.len(), texts.len());
        }

        Ok(all_embeddings)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let mut config = GeminiConfig::default();
        config.api_key = Some("k".to_string());
        let embedder = GeminiEmbedder::new(&config).unwrap();

        let json = serde_json::to_value(embedder.request("hello", TaskType::RetrievalQuery)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "models/embedding-001",
                "content": { "parts": [{ "text": "hello" }] },
                "taskType": "RETRIEVAL_QUERY"
            })
        );
    }

    #[test]
    fn test_batch_response_parses() {
        let body = r#"{"embeddings": [{"values": [0.1, 0.2]}, {"values": [0.3, 0.4]}]}"#;
        let parsed: BatchEmbedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.embeddings.len(), 2);
        assert_eq!(parsed.embeddings[1].values, vec![0.3, 0.4]);
    }
}
