//! Builds a `DocumentIndex` from a directory of files

use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::ingestion::{DirectoryReader, TextChunker};
use crate::providers::EmbeddingProvider;

use super::store::{DocumentIndex, IndexedDocument, Node};

/// Reads, chunks, and embeds every document in a directory
pub struct IndexBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
    chunking: ChunkingConfig,
}

impl IndexBuilder {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, chunking: ChunkingConfig) -> Self {
        Self { embedder, chunking }
    }

    /// Build a query-ready index from the files directly inside `dir`
    pub async fn build(&self, dir: &Path) -> Result<DocumentIndex> {
        let dir: PathBuf = dir.to_path_buf();
        let loaded = tokio::task::spawn_blocking(move || DirectoryReader::new(dir).load_data())
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        let chunker = TextChunker::new(self.chunking.chunk_size, self.chunking.chunk_overlap);

        let mut documents = Vec::with_capacity(loaded.len());
        let mut pending: Vec<(Uuid, String, String)> = Vec::new();

        for doc in loaded {
            let id = Uuid::new_v4();
            let chunks = chunker.chunk(&doc.content);
            tracing::debug!("{}: {} chunks", doc.filename, chunks.len());

            documents.push(IndexedDocument {
                id,
                filename: doc.filename.clone(),
                file_type: doc.file_type,
                content_hash: doc.content_hash,
                node_count: chunks.len(),
            });
            pending.extend(chunks.into_iter().map(|text| (id, doc.filename.clone(), text)));
        }

        let texts: Vec<String> = pending.iter().map(|(_, _, text)| text.clone()).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            self.embedder.embed_batch(&texts).await?
        };

        if embeddings.len() != pending.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                pending.len(),
                embeddings.len()
            )));
        }

        let nodes: Vec<Node> = pending
            .into_iter()
            .zip(embeddings)
            .map(|((document_id, filename, text), embedding)| Node {
                id: Uuid::new_v4(),
                document_id,
                filename,
                text,
                embedding,
            })
            .collect();

        tracing::info!(
            "Built index: {} documents, {} nodes",
            documents.len(),
            nodes.len()
        );

        Ok(DocumentIndex::new(self.embedder.model(), documents, nodes))
    }
}
