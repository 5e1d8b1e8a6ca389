// file: src/extractor/mod.rs
// description: document text extraction module exports
// reference: internal module structure

pub mod normalizer;
pub mod pdf;

pub use normalizer::TextNormalizer;
pub use pdf::PdfExtractor;
