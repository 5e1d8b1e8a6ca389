// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{Result, SummarizeError};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            SummarizeError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(SummarizeError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_pdf_extension(path: &Path) -> Result<()> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Ok(()),
            _ => Err(SummarizeError::Validation(format!(
                "File is not a PDF file: {}",
                path.display()
            ))),
        }
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(SummarizeError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    /// Reads an instruction from a file, rejecting blank files.
    pub fn read_instruction_file(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).map_err(|source| SummarizeError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;
        Self::validate_content_not_empty(&content)?;
        Ok(content)
    }

    /// Truncates on a character boundary, appending `...` when shortened.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        }
    }

    /// Single-line preview of a text block.
    pub fn preview(text: &str, max_chars: usize) -> String {
        let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::truncate_text(&flattened, max_chars)
    }
}
