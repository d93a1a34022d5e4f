//! OpenAI embeddings client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

/// Embedder backed by the OpenAI `/embeddings` endpoint
pub struct OpenAiEmbedder {
    client: Client,
    config: EmbeddingConfig,
    api_key: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(config: &EmbeddingConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: super::http_client(None)?,
            config: config.clone(),
            api_key: api_key.into(),
        })
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let request = EmbedRequest {
            model: &self.config.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {} - {}",
                status, body
            )));
        }

        let mut parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.batch_size.max(1)) {
            tracing::debug!("Embedding batch of {} texts", batch.len());
            embeddings.extend(self.request(batch).await?);
        }
        Ok(embeddings)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Echoes back one embedding per input, `[len(text), index]`, in reverse order
    async fn fake_embeddings(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(headers["authorization"], "Bearer sk-test");
        let inputs = body["input"].as_array().unwrap().clone();
        let data: Vec<Value> = inputs
            .iter()
            .enumerate()
            .rev()
            .map(|(i, text)| {
                json!({ "index": i, "embedding": [text.as_str().unwrap().len() as f32, i as f32] })
            })
            .collect();
        Json(json!({ "data": data, "model": body["model"] }))
    }

    #[tokio::test]
    async fn test_embed_batch_orders_and_batches() {
        let base_url = serve(Router::new().route("/embeddings", post(fake_embeddings))).await;
        let config = EmbeddingConfig {
            base_url,
            batch_size: 2,
            ..Default::default()
        };
        let embedder = OpenAiEmbedder::new(&config, "sk-test").unwrap();

        let texts: Vec<String> = ["a", "bb", "ccc"].iter().map(|s| s.to_string()).collect();
        let embeddings = embedder.embed_batch(&texts).await.unwrap();

        // Third text lands in its own batch, so its index restarts at 0
        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![2.0, 1.0], vec![3.0, 0.0]]);
        assert_eq!(embedder.model(), "text-embedding-ada-002");
    }

    #[tokio::test]
    async fn test_http_error_maps_to_embedding_error() {
        let router = Router::new().route(
            "/embeddings",
            post(|| async { (axum::http::StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let base_url = serve(router).await;
        let config = EmbeddingConfig {
            base_url,
            ..Default::default()
        };
        let embedder = OpenAiEmbedder::new(&config, "sk-test").unwrap();

        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, Error::Embedding(ref msg) if msg.contains("401")));
    }
}
