// file: src/exporter/mod.rs
// description: summary export module exports
// reference: internal module structure

pub mod json;

pub use json::{ExportFormat, ExportedSummary, SummaryExporter};
