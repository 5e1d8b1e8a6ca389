// file: src/llm/mod.rs
// description: text generation client abstraction and provider implementations
// reference: internal module structure

pub mod gemini;
mod types;

pub use gemini::GeminiClient;

use crate::error::ModelError;
use async_trait::async_trait;

/// One remote text-generation request per call. Implementations keep no
/// state between calls and never retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    /// Identifier of the model answering the requests.
    fn model_id(&self) -> &str;
}
