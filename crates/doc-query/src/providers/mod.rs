//! Provider abstractions for embeddings and answer generation
//!
//! The index and query engine only see these traits, so hosted backends can
//! be swapped for stubs in tests.

pub mod embedding;
pub mod groq;
pub mod llm;
pub mod openai;

pub use embedding::EmbeddingProvider;
pub use groq::GroqLlm;
pub use llm::LlmProvider;
pub use openai::OpenAiEmbedder;

use std::time::Duration;

use crate::error::Result;

/// Build the shared HTTP client; a missing timeout waits indefinitely
pub(crate) fn http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().pool_max_idle_per_host(5);
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}
