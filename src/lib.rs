// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod chunking;
pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use chunking::ChunkSplitter;
pub use config::{ChunkingConfig, CombineStrategy, Config, ModelConfig, SummaryConfig};
pub use error::{ModelError, Result, SummarizeError};
pub use exporter::{ExportFormat, SummaryExporter};
pub use extractor::{PdfExtractor, TextNormalizer};
pub use llm::{GeminiClient, ModelClient};
pub use models::{Chunk, SourceDocument, Summary, SummaryStats, TextSegment};
pub use pipeline::{ProgressTracker, PromptTemplate, Summarizer};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let splitter = ChunkSplitter::from_config(&config.chunking).unwrap();
        assert_eq!(splitter.overlap_size(), 1_000);
        assert!(PromptTemplate::new("Summarize").is_ok());
    }
}
