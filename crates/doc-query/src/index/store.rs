//! In-memory index with JSON persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use crate::config::INDEX_FILE_NAME;
use crate::error::{Error, Result};
use crate::ingestion::FileType;

/// On-disk format version
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// A source document that contributed nodes to the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: Uuid,
    pub filename: String,
    pub file_type: FileType,
    pub content_hash: String,
    pub node_count: usize,
}

/// One embedded chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A node returned from a search, with its cosine similarity
#[derive(Debug, Clone)]
pub struct ScoredNode<'a> {
    pub node: &'a Node,
    pub similarity: f32,
}

/// A fully built, query-ready index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndex {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    /// Embedding model the node vectors came from
    pub embed_model: String,
    pub documents: Vec<IndexedDocument>,
    pub nodes: Vec<Node>,
}

impl DocumentIndex {
    pub fn new(
        embed_model: impl Into<String>,
        documents: Vec<IndexedDocument>,
        nodes: Vec<Node>,
    ) -> Self {
        Self {
            version: INDEX_FORMAT_VERSION,
            created_at: Utc::now(),
            embed_model: embed_model.into(),
            documents,
            nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top `top_k` nodes by cosine similarity, highest first
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<ScoredNode<'_>> {
        let mut results: Vec<ScoredNode<'_>> = self
            .nodes
            .iter()
            .map(|node| ScoredNode {
                node,
                similarity: cosine_similarity(query_embedding, &node.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(top_k);
        results
    }

    /// Write `index.json` into `dir`, replacing any previous file atomically
    pub fn persist(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, self)?;
        tmp.flush()?;

        let path = dir.join(INDEX_FILE_NAME);
        tmp.persist(&path)
            .map_err(|e| Error::IndexStore(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!(
            "Persisted index ({} documents, {} nodes) to {}",
            self.documents.len(),
            self.nodes.len(),
            path.display()
        );
        Ok(())
    }

    /// Load the index persisted in `dir`; `None` when there is no `index.json`
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(INDEX_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }

        let data = std::fs::read(&path)?;
        let index: Self = serde_json::from_slice(&data)
            .map_err(|e| Error::IndexStore(format!("Failed to read {}: {}", path.display(), e)))?;

        if index.version != INDEX_FORMAT_VERSION {
            return Err(Error::IndexStore(format!(
                "Unsupported index version {} in {}",
                index.version,
                path.display()
            )));
        }

        Ok(Some(index))
    }
}

/// Cosine similarity; zero vectors and mismatched dimensions score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
