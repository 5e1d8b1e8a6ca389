// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod progress;
mod prompt;

pub use orchestrator::{PARTIAL_SEPARATOR, Summarizer};
pub use progress::{ProgressSnapshot, ProgressTracker};
pub use prompt::PromptTemplate;
