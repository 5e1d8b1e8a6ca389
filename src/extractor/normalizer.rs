// file: src/extractor/normalizer.rs
// description: cleanup of raw PDF page text before chunking
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "exam-\nple" -> "example" when a word is split across a line break
    static ref HYPHENATED_BREAK: Regex =
        Regex::new(r"(\p{Ll})-\n(\p{Ll})").expect("HYPHENATED_BREAK regex is valid");

    static ref BLANK_LINE_RUN: Regex =
        Regex::new(r"\n{3,}").expect("BLANK_LINE_RUN regex is valid");

    static ref INLINE_SPACE_RUN: Regex =
        Regex::new(r"[ \t\u{a0}]{2,}").expect("INLINE_SPACE_RUN regex is valid");
}

#[derive(Debug, Clone)]
pub struct TextNormalizer {
    join_hyphenated: bool,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            join_hyphenated: true,
        }
    }

    pub fn with_hyphen_joining(mut self, enabled: bool) -> Self {
        self.join_hyphenated = enabled;
        self
    }

    pub fn normalize(&self, content: &str) -> String {
        let mut normalized = self.normalize_line_endings(content);
        normalized = self.strip_control_chars(&normalized);
        normalized = self.normalize_line_breaks(&normalized);

        if self.join_hyphenated {
            normalized = HYPHENATED_BREAK.replace_all(&normalized, "$1$2").into_owned();
        }

        normalized.trim().to_string()
    }

    fn normalize_line_endings(&self, content: &str) -> String {
        content.replace("\r\n", "\n").replace('\r', "\n")
    }

    fn strip_control_chars(&self, content: &str) -> String {
        content
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect()
    }

    fn normalize_line_breaks(&self, content: &str) -> String {
        let trimmed = content
            .lines()
            .map(|line| INLINE_SPACE_RUN.replace_all(line.trim_end(), " ").into_owned())
            .collect::<Vec<_>>()
            .join("\n");

        BLANK_LINE_RUN.replace_all(&trimmed, "\n\n").into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
