// file: src/models/segment.rs
// description: source document buffer and page-level text segments
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Raw PDF bytes handed over by the caller for a single request.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Vec<u8>,
    pub content_hash: String,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let content_hash = Self::compute_hash(&bytes);
        Self {
            name: name.into(),
            bytes,
            content_hash,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    fn compute_hash(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }
}

/// Text extracted from one page. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub page: u32,
    pub text: String,
}

impl TextSegment {
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
