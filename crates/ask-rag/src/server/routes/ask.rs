//! Question endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse};

/// POST /ask - answer a question from the indexed documents
pub async fn ask(
    State(state): State<AppState>,
    request: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>> {
    let Json(request) = request.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    let question = request.question().ok_or(Error::MissingQuestion)?;

    tracing::info!("Question: \"{}\"", question);

    let response = state.chain().ask(question).await?;

    tracing::debug!("Sources: {:?}", response.sources);

    Ok(Json(response))
}
