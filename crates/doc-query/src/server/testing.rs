//! Deterministic providers for server tests

use async_trait::async_trait;
use std::path::Path;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, LlmProvider};

/// Config whose staging and index directories live under `root`
pub fn test_config(root: &Path) -> RagConfig {
    let mut config = RagConfig::default();
    config.storage.upload_dir = root.join("uploaded_files");
    config.storage.index_dir = root.join("index_data");
    config
}

/// Embeds text onto two axes: mentions of "sky" and mentions of "grass"
pub struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                vec![
                    if t.contains("sky") { 1.0 } else { 0.0 },
                    if t.contains("grass") { 1.0 } else { 0.0 },
                    0.1,
                ]
            })
            .collect())
    }

    fn model(&self) -> &str {
        "keyword"
    }
}

/// Always fails, standing in for an unreachable embedding API
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::embedding("connection refused"))
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// Answers with the retrieved context block, so tests can see what was retrieved
pub struct ContextEchoLlm;

#[async_trait]
impl LlmProvider for ContextEchoLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let context = prompt
            .split("---------------------")
            .nth(1)
            .unwrap_or_default()
            .trim();
        Ok(context.to_string())
    }

    fn model(&self) -> &str {
        "context-echo"
    }
}
