// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod chunk;
pub mod segment;
pub mod summary;

pub use chunk::Chunk;
pub use segment::{SourceDocument, TextSegment};
pub use summary::{Summary, SummaryStats};
