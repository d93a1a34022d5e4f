//! Document loading and chunking

pub mod chunker;
pub mod reader;

pub use chunker::TextChunker;
pub use reader::{DirectoryReader, FileType, LoadedDocument};
