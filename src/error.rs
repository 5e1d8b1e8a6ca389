// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SummarizeError>;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction failed for {source_name}: {message}")]
    Extraction {
        source_name: String,
        message: String,
    },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document {0} contains no extractable text")]
    EmptyDocument(String),

    #[error("Model invocation failed on chunk {chunk} of {total}: {source}")]
    ModelInvocation {
        chunk: usize,
        total: usize,
        source: ModelError,
    },

    #[error("Reduction pass failed: {source}")]
    Reduction { source: ModelError },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SummarizeError {
    pub fn extraction(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// The model-side failure behind this error, if any.
    pub fn model_error(&self) -> Option<&ModelError> {
        match self {
            Self::ModelInvocation { source, .. } | Self::Reduction { source } => Some(source),
            _ => None,
        }
    }
}

/// Failures reported by a [`crate::llm::ModelClient`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("model error: {0}")]
    Model(String),
}
