//! Application state for the query server

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::RagConfig;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::generation::QueryEngine;
use crate::index::{DocumentIndex, IndexBuilder};
use crate::providers::{EmbeddingProvider, GroqLlm, LlmProvider, OpenAiEmbedder};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Embedding backend used for both indexing and queries
    embedder: Arc<dyn EmbeddingProvider>,
    /// Answer generation backend
    llm: Arc<dyn LlmProvider>,
    /// Current index; replaced whole, never mutated in place
    index: RwLock<Option<Arc<DocumentIndex>>>,
    /// Serialises clear-save-build on the staging directory
    upload_lock: Mutex<()>,
}

impl AppState {
    /// Create state around explicit providers, with no index loaded
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                embedder,
                llm,
                index: RwLock::new(None),
                upload_lock: Mutex::new(()),
            }),
        }
    }

    /// Create state backed by the hosted OpenAI and Groq APIs
    pub fn with_hosted_providers(config: RagConfig, credentials: &Credentials) -> Result<Self> {
        let embedder = OpenAiEmbedder::new(&config.embeddings, &credentials.openai_api_key)?;
        tracing::info!("Embedding provider initialized (model: {})", config.embeddings.model);

        let llm = GroqLlm::new(&config.llm, &credentials.groq_api_key)?;
        tracing::info!("LLM provider initialized (model: {})", config.llm.model);

        Ok(Self::new(config, Arc::new(embedder), Arc::new(llm)))
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Current index snapshot, if one has been built or loaded
    pub fn index(&self) -> Option<Arc<DocumentIndex>> {
        self.inner.index.read().clone()
    }

    /// Whether queries can be answered
    pub fn is_ready(&self) -> bool {
        self.inner.index.read().is_some()
    }

    /// Install a new index, returning the one it replaced
    pub fn replace_index(&self, index: DocumentIndex) -> Option<Arc<DocumentIndex>> {
        self.inner.index.write().replace(Arc::new(index))
    }

    /// Hold for the whole upload sequence
    pub async fn lock_uploads(&self) -> MutexGuard<'_, ()> {
        self.inner.upload_lock.lock().await
    }

    /// Builder wired to this state's embedder and chunking settings
    pub fn index_builder(&self) -> IndexBuilder {
        IndexBuilder::new(
            Arc::clone(&self.inner.embedder),
            self.inner.config.chunking.clone(),
        )
    }

    /// Query engine over the current index, or `None` before any index exists
    pub fn query_engine(&self) -> Option<QueryEngine> {
        self.index().map(|index| {
            QueryEngine::new(
                index,
                Arc::clone(&self.inner.embedder),
                Arc::clone(&self.inner.llm),
                self.inner.config.llm.top_k,
            )
        })
    }

    /// Load the persisted index at startup. A missing file leaves the state
    /// without an index; an unreadable one, or one embedded with a different
    /// model, is logged and treated the same.
    pub fn load_persisted_index(&self) -> bool {
        let dir = &self.inner.config.storage.index_dir;
        match DocumentIndex::load(dir) {
            Ok(Some(index)) if index.embed_model != self.inner.embedder.model() => {
                tracing::warn!(
                    "Ignoring persisted index: built with embedding model {}, configured {}",
                    index.embed_model,
                    self.inner.embedder.model()
                );
                false
            }
            Ok(Some(index)) => {
                tracing::info!(
                    "Loaded persisted index from {} ({} documents, {} nodes)",
                    dir.display(),
                    index.documents.len(),
                    index.len()
                );
                self.replace_index(index);
                true
            }
            Ok(None) => {
                tracing::info!("No persisted index in {}; upload files first", dir.display());
                false
            }
            Err(e) => {
                tracing::warn!("Ignoring persisted index: {}", e);
                false
            }
        }
    }
}
