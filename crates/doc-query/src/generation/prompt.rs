//! Prompt templates for question answering

use crate::index::ScoredNode;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from retrieved nodes
    pub fn build_context(results: &[ScoredNode<'_>]) -> String {
        results
            .iter()
            .map(|r| format!("file_name: {}\n\n{}", r.node.filename, r.node.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build a question-answering prompt grounded in `context`
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Context information is below.
---------------------
{context}
---------------------
Given the context information and not prior knowledge, answer the query.
Query: {question}
Answer: "#,
            context = context,
            question = question
        )
    }
}
