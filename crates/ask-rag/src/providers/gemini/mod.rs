//! Google Generative Language API providers
//!
//! - `GeminiEmbedder`: embedding-001 via embedContent / batchEmbedContents
//! - `GeminiClient`: Gemini models via generateContent
//!
//! Both authenticate with an API key sent in the `x-goog-api-key` header.

mod client;
mod embedder;

pub use client::GeminiClient;
pub use embedder::GeminiEmbedder;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};

/// Shared HTTP plumbing for the Generative Language API
#[derive(Clone)]
pub(crate) struct GeminiApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiApi {
    pub(crate) fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("Gemini API key is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// URL for a model method, e.g. `models/gemini-1.5-flash:generateContent`
    pub(crate) fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/{}:{}", self.base_url, model_resource(model), method)
    }

    /// POST a JSON body and decode the JSON response.
    ///
    /// Failures are wrapped by `wrap` so callers can report them as embedding
    /// or LLM errors.
    pub(crate) async fn post<B, R>(
        &self,
        url: &str,
        body: &B,
        wrap: fn(String) -> Error,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| wrap(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(wrap(format!(
                "Gemini request failed ({}): {}",
                status,
                api_error_message(&body)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| wrap(format!("Failed to parse Gemini response: {}", e)))
    }
}

/// Normalize a model name to its `models/...` resource form
pub(crate) fn model_resource(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull the message out of a Google API error body, or fall back to the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}
