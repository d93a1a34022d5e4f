//! Query engine binding an index to a fixed LLM

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::index::DocumentIndex;
use crate::providers::{EmbeddingProvider, LlmProvider};

use super::prompt::PromptBuilder;

/// Answers questions against one index snapshot
pub struct QueryEngine {
    index: Arc<DocumentIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl QueryEngine {
    pub fn new(
        index: Arc<DocumentIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            llm,
            top_k,
        }
    }

    /// Retrieve context for `question` and ask the LLM
    pub async fn query(&self, question: &str) -> Result<String> {
        let start = Instant::now();

        let context = if self.index.is_empty() {
            String::new()
        } else {
            let query_embedding = self.embedder.embed(question).await?;
            let results = self.index.search(&query_embedding, self.top_k);
            tracing::debug!(
                "Retrieved {} nodes (best similarity {:.3})",
                results.len(),
                results.first().map(|r| r.similarity).unwrap_or(0.0)
            );
            PromptBuilder::build_context(&results)
        };

        let prompt = PromptBuilder::build_qa_prompt(question, &context);
        let answer = self.llm.complete(&prompt).await?;

        tracing::info!(
            "Query answered by {} in {}ms",
            self.llm.model(),
            start.elapsed().as_millis()
        );

        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Node;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use uuid::Uuid;

    /// Axis-aligned embeddings keyed on a keyword
    struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.to_lowercase().contains("sky") {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }

        fn model(&self) -> &str {
            "keyword"
        }
    }

    struct RecordingLlm {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            Ok("  green  ".to_string())
        }

        fn model(&self) -> &str {
            "recording"
        }
    }

    fn node(text: &str, embedding: Vec<f32>) -> Node {
        Node {
            id: Uuid::new_v4(),
            document_id: Uuid::nil(),
            filename: "facts.txt".into(),
            text: text.into(),
            embedding,
        }
    }

    #[tokio::test]
    async fn test_query_uses_closest_node_as_context() {
        let index = Arc::new(DocumentIndex::new(
            "keyword",
            Vec::new(),
            vec![
                node("The sky is green.", vec![1.0, 0.0]),
                node("Grass is blue.", vec![0.0, 1.0]),
            ],
        ));
        let llm = Arc::new(RecordingLlm {
            prompts: Mutex::new(Vec::new()),
        });
        let engine = QueryEngine::new(index, Arc::new(KeywordEmbedder), llm.clone(), 1);

        let answer = engine.query("What colour is the sky?").await.unwrap();
        assert_eq!(answer, "green");

        let prompts = llm.prompts.lock();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("The sky is green."));
        assert!(!prompts[0].contains("Grass is blue."));
    }

    #[tokio::test]
    async fn test_empty_index_still_asks_llm() {
        let index = Arc::new(DocumentIndex::new("keyword", Vec::new(), Vec::new()));
        let llm = Arc::new(RecordingLlm {
            prompts: Mutex::new(Vec::new()),
        });
        let engine = QueryEngine::new(index, Arc::new(KeywordEmbedder), llm.clone(), 2);

        engine.query("anything").await.unwrap();
        assert!(llm.prompts.lock()[0].contains("Query: anything"));
    }
}
