//! API routes for the query server

pub mod query;
pub mod upload;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload - with larger body limit for file uploads
        .route(
            "/upload",
            post(upload::upload_files).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/query", post(query::query_data))
}
