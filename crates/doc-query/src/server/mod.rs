//! HTTP server for the document query service

pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{Error, Result};
use state::AppState;

/// Query HTTP server
pub struct RagServer {
    state: AppState,
}

impl RagServer {
    /// Create a server around prepared state
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes
    pub fn router(state: AppState) -> Router {
        let server = &state.config().server;
        let enable_cors = server.enable_cors;

        let router = Router::new()
            .route("/health", get(health_check))
            .merge(routes::api_routes(server.max_upload_size))
            .with_state(state.clone())
            .layer(TraceLayer::new_for_http());

        if enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = Self::router(self.state);

        tracing::info!("Starting query server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        let server = &self.state.config().server;
        format!("{}:{}", server.host, server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
