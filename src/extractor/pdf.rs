// file: src/extractor/pdf.rs
// description: page-level plain text extraction from PDF buffers
// reference: https://docs.rs/lopdf

use crate::error::{Result, SummarizeError};
use crate::extractor::normalizer::TextNormalizer;
use crate::models::{SourceDocument, TextSegment};
use lopdf::Document;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    normalizer: TextNormalizer,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    /// Reads a PDF from disk into memory. Missing or unreadable files are
    /// reported as extraction failures.
    pub fn load_source(path: &Path) -> Result<SourceDocument> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = fs::read(path).map_err(|e| {
            SummarizeError::extraction(
                path.display().to_string(),
                format!("cannot read file: {}", e),
            )
        })?;

        Ok(SourceDocument::new(name, bytes))
    }

    pub fn extract_path(&self, path: &Path) -> Result<Vec<TextSegment>> {
        let document = Self::load_source(path)?;
        self.extract(&document)
    }

    /// Returns one segment per page that still has text after normalization,
    /// in page order.
    pub fn extract(&self, document: &SourceDocument) -> Result<Vec<TextSegment>> {
        if !has_pdf_header(&document.bytes) {
            return Err(SummarizeError::extraction(
                &document.name,
                "not a PDF file (no %PDF- header in the first 1024 bytes)",
            ));
        }

        let pdf = Document::load_mem(&document.bytes).map_err(|e| {
            SummarizeError::extraction(&document.name, format!("failed to parse PDF: {}", e))
        })?;

        if pdf.is_encrypted() {
            return Err(SummarizeError::extraction(
                &document.name,
                "encrypted PDFs are not supported",
            ));
        }

        let pages = pdf.get_pages();
        debug!("{} has {} page(s)", document.name, pages.len());

        let mut segments = Vec::with_capacity(pages.len());

        for page_number in pages.keys().copied() {
            let raw = match pdf.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        "Failed to extract text from page {} of {}: {}",
                        page_number, document.name, e
                    );
                    continue;
                }
            };

            let text = self.normalizer.normalize(&raw);
            if !text.is_empty() {
                segments.push(TextSegment::new(page_number, text));
            }
        }

        info!(
            "Extracted {} text page(s) out of {} from {}",
            segments.len(),
            pages.len(),
            document.name
        );

        Ok(segments)
    }
}

/// Readers tolerate leading junk (BOMs, mail headers) before the header.
fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const HEADER_SEARCH_WINDOW: usize = 1024;
