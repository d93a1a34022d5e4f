//! Query endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

pub const MISSING_QUERY: &str = "Query is missing.";
pub const NO_INDEX: &str = "No index available. Upload files first.";

/// POST /query - Answer a question against the current index
pub async fn query_data(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let question = payload
        .ok()
        .and_then(|Json(request)| request.query)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| Error::bad_request(MISSING_QUERY))?;

    let engine = state
        .query_engine()
        .ok_or_else(|| Error::bad_request(NO_INDEX))?;

    tracing::info!("Query: \"{}\"", question);
    let response = engine.query(&question).await?;

    Ok(Json(QueryResponse { response }))
}
