// file: src/chunking/mod.rs
// description: document chunking module exports
// reference: internal module structure

pub mod splitter;

pub use splitter::{ChunkSplitter, SEGMENT_SEPARATOR};
