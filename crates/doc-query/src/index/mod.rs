//! Vector index over uploaded documents

pub mod builder;
pub mod store;

pub use builder::IndexBuilder;
pub use store::{DocumentIndex, IndexedDocument, Node, ScoredNode};
