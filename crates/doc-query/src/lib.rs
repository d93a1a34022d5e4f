//! doc-query: upload documents, index them, and ask questions about them
//!
//! The service exposes two endpoints. `POST /upload` replaces the staging
//! directory with the uploaded files and rebuilds the index over them.
//! `POST /query` answers a question against the current index by retrieving
//! the closest chunks and passing them as context to a hosted LLM.

pub mod config;
pub mod credentials;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use credentials::{Credentials, PromptMode};
pub use error::{Error, Result};
pub use index::{DocumentIndex, IndexBuilder};
pub use server::{state::AppState, RagServer};
