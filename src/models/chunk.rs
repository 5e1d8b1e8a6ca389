// file: src/models/chunk.rs
// description: bounded span of document text sized for a single model call
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position in reading order.
    pub index: usize,
    pub text: String,
    /// Character offset of the first character of `text` in the joined document text.
    pub start: usize,
    /// Number of leading characters copied from the end of the previous chunk.
    pub overlap: usize,
    pub first_page: u32,
    pub last_page: u32,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Character offset one past the last character of this chunk.
    pub fn end(&self) -> usize {
        self.start + self.char_len()
    }

    /// The part of the chunk not shared with its predecessor.
    pub fn fresh_text(&self) -> &str {
        match self.text.char_indices().nth(self.overlap) {
            Some((byte_idx, _)) => &self.text[byte_idx..],
            None => "",
        }
    }

    /// The leading overlap copied from the previous chunk.
    pub fn overlap_text(&self) -> &str {
        let fresh = self.fresh_text();
        &self.text[..self.text.len() - fresh.len()]
    }

    /// Human readable page span, e.g. `p. 3` or `pp. 3-5`.
    pub fn page_span(&self) -> String {
        if self.first_page == self.last_page {
            format!("p. {}", self.first_page)
        } else {
            format!("pp. {}-{}", self.first_page, self.last_page)
        }
    }
}
