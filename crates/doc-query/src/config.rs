//! Configuration for the document query service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the persisted index file inside the index directory
pub const INDEX_FILE_NAME: &str = "index.json";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Filesystem layout
    pub storage: StorageConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Answer generation configuration
    pub llm: LlmConfig,
}

impl RagConfig {
    /// Apply startup overrides; anything left as `None` keeps its default
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(dir) = overrides.upload_dir {
            self.storage.upload_dir = dir;
        }
        if let Some(dir) = overrides.index_dir {
            self.storage.index_dir = dir;
        }
        if let Some(debug) = overrides.debug {
            self.server.debug = debug;
        }
        self
    }
}

/// Values supplied at process start (CLI flags)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_dir: Option<PathBuf>,
    pub index_dir: Option<PathBuf>,
    pub debug: Option<bool>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
    /// Verbose request logging
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
            debug: true,
        }
    }
}

/// Fixed filesystem locations used by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Staging directory, cleared and repopulated on every upload
    pub upload_dir: PathBuf,
    /// Directory holding the persisted index
    pub index_dir: PathBuf,
}

impl StorageConfig {
    /// Path of the persisted index file
    pub fn index_file(&self) -> PathBuf {
        self.index_dir.join(INDEX_FILE_NAME)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploaded_files"),
            index_dir: PathBuf::from("./index_data"),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Texts sent per embedding request
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-ada-002".to_string(),
            batch_size: 10,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in bytes of UTF-8 text
    pub chunk_size: usize,
    /// Overlap between chunks in bytes of UTF-8 text
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_overlap: 200,
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Groq (OpenAI-compatible) API base URL
    pub base_url: String,
    /// Generation model, used for every query
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Chunks retrieved as context per query
    pub top_k: usize,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-70b-8192".to_string(),
            temperature: 0.1,
            top_k: 2,
            timeout_secs: None,
        }
    }
}
