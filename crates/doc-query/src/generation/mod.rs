//! Retrieval-augmented answer generation

pub mod prompt;
pub mod query_engine;

pub use prompt::PromptBuilder;
pub use query_engine::QueryEngine;
