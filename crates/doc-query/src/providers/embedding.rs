//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;
use crate::error::{Error, Result};

/// Trait for generating text embeddings
///
/// Implementations:
/// - `OpenAiEmbedder`: OpenAI embeddings API (text-embedding-ada-002)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| Error::embedding("No embedding returned"))
    }

    /// Model name recorded in the persisted index
    fn model(&self) -> &str;
}
