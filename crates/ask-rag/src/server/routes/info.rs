//! Service info endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::state::AppState;

/// Body of `GET /info`
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub backend: &'static str,
    pub embedding_model: String,
    pub generation_model: String,
    pub top_k: usize,
    pub documents: usize,
    pub chunks: usize,
    pub sources: Vec<String>,
}

/// GET /info - describe the running service and its index
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let chain = state.chain();
    let index = chain.index();

    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        backend: state.config().backend.as_str(),
        embedding_model: chain.embedder().model().to_string(),
        generation_model: chain.llm().model().to_string(),
        top_k: chain.top_k(),
        documents: index.documents().len(),
        chunks: index.len(),
        sources: index.source_names().into_iter().collect(),
    })
}
