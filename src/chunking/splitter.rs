// file: src/chunking/splitter.rs
// description: overlap-aware character splitter that prefers natural break points
// reference: recursive character splitting (paragraph, line, sentence, word, hard cut)

use crate::config::ChunkingConfig;
use crate::error::{Result, SummarizeError};
use crate::models::{Chunk, TextSegment};
use tracing::debug;

/// Separator placed between page segments when they are joined.
pub const SEGMENT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Paragraph,
    Line,
    Sentence,
    Word,
}

impl Boundary {
    const PRIORITY: [Boundary; 4] = [
        Boundary::Paragraph,
        Boundary::Line,
        Boundary::Sentence,
        Boundary::Word,
    ];

    /// Whether a chunk ending right before `end` stops on this kind of boundary.
    fn matches(self, chars: &[char], end: usize) -> bool {
        let last = chars[end - 1];
        let before = if end >= 2 { Some(chars[end - 2]) } else { None };

        match self {
            Boundary::Paragraph => last == '\n' && before == Some('\n'),
            Boundary::Line => last == '\n',
            Boundary::Sentence => {
                last.is_whitespace() && matches!(before, Some('.') | Some('!') | Some('?'))
            }
            Boundary::Word => last.is_whitespace(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    max_chunk_size: usize,
    overlap_size: usize,
}

impl ChunkSplitter {
    pub fn new(max_chunk_size: usize, overlap_size: usize) -> Result<Self> {
        if max_chunk_size == 0 {
            return Err(SummarizeError::Config(
                "max_chunk_size must be greater than 0".to_string(),
            ));
        }

        if overlap_size >= max_chunk_size {
            return Err(SummarizeError::Config(format!(
                "overlap_size ({}) must be smaller than max_chunk_size ({})",
                overlap_size, max_chunk_size
            )));
        }

        Ok(Self {
            max_chunk_size,
            overlap_size,
        })
    }

    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.max_chunk_size, config.overlap_size)
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn overlap_size(&self) -> usize {
        self.overlap_size
    }

    /// Upper bound on the number of chunks produced for `total_chars` characters.
    pub fn chunk_budget(&self, total_chars: usize) -> usize {
        if total_chars == 0 {
            0
        } else if total_chars <= self.max_chunk_size {
            1
        } else {
            let step = self.max_chunk_size - self.overlap_size;
            (total_chars - self.overlap_size).div_ceil(step)
        }
    }

    /// Joins segments with [`SEGMENT_SEPARATOR`] and splits the result.
    pub fn split(&self, segments: &[TextSegment]) -> Vec<Chunk> {
        let mut text = String::new();
        let mut page_starts = Vec::with_capacity(segments.len());
        let mut offset = 0;

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                text.push_str(SEGMENT_SEPARATOR);
                offset += SEGMENT_SEPARATOR.chars().count();
            }
            page_starts.push((offset, segment.page));
            text.push_str(&segment.text);
            offset += segment.char_len();
        }

        self.split_with_pages(&text, &page_starts)
    }

    /// Splits free text; every chunk is attributed to page 1.
    pub fn split_text(&self, text: &str) -> Vec<Chunk> {
        self.split_with_pages(text, &[(0, 1)])
    }

    fn split_with_pages(&self, text: &str, page_starts: &[(usize, u32)]) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let spans = self.spans(&chars);

        let page_at = |offset: usize| -> u32 {
            page_starts
                .iter()
                .take_while(|(start, _)| *start <= offset)
                .last()
                .map(|(_, page)| *page)
                .unwrap_or(1)
        };

        let chunks: Vec<Chunk> = spans
            .iter()
            .enumerate()
            .map(|(index, &(start, end))| Chunk {
                index,
                text: chars[start..end].iter().collect(),
                start,
                overlap: if index == 0 { 0 } else { self.overlap_size },
                first_page: page_at(start),
                last_page: page_at(end - 1),
            })
            .collect();

        debug!(
            "Split {} chars into {} chunk(s) (max {}, overlap {})",
            chars.len(),
            chunks.len(),
            self.max_chunk_size,
            self.overlap_size
        );

        chunks
    }

    /// Computes `[start, end)` character spans. Consecutive spans share exactly
    /// `overlap_size` characters and the span count never exceeds
    /// [`Self::chunk_budget`].
    fn spans(&self, chars: &[char]) -> Vec<(usize, usize)> {
        let total = chars.len();
        let budget = self.chunk_budget(total);

        if budget <= 1 {
            return if total == 0 { vec![] } else { vec![(0, total)] };
        }

        let step = self.max_chunk_size - self.overlap_size;
        let mut spans = Vec::with_capacity(budget);
        let mut start = 0;

        loop {
            let hard_end = (start + self.max_chunk_size).min(total);
            if hard_end == total {
                spans.push((start, total));
                break;
            }

            // An early break must leave few enough characters for the chunks
            // still available, and must be longer than the overlap.
            let chunks_after = budget.saturating_sub(spans.len() + 1);
            let min_end = (start + self.overlap_size + 1)
                .max(total.saturating_sub(chunks_after * step));

            let end = Self::find_break(chars, min_end, hard_end);
            spans.push((start, end));
            start = end - self.overlap_size;
        }

        spans
    }

    fn find_break(chars: &[char], min_end: usize, hard_end: usize) -> usize {
        if min_end >= hard_end {
            return hard_end;
        }

        for boundary in Boundary::PRIORITY {
            if let Some(end) = (min_end..=hard_end)
                .rev()
                .find(|&end| boundary.matches(chars, end))
            {
                return end;
            }
        }

        hard_end
    }
}
