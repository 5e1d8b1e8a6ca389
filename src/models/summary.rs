// file: src/models/summary.rs
// description: final summary and run statistics
// reference: internal data structures

use crate::config::CombineStrategy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub pages: usize,
    pub chunks: usize,
    pub model_calls: usize,
    pub input_chars: usize,
    pub output_chars: usize,
    pub duration_ms: u64,
}

impl SummaryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output characters per input character, 0 when nothing was read.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_chars == 0 {
            return 0.0;
        }
        self.output_chars as f64 / self.input_chars as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub source_name: String,
    pub source_hash: Option<String>,
    pub model: String,
    pub strategy: CombineStrategy,
    pub stats: SummaryStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_ratio() {
        let mut stats = SummaryStats::new();
        assert_eq!(stats.compression_ratio(), 0.0);

        stats.input_chars = 1000;
        stats.output_chars = 100;
        assert!((stats.compression_ratio() - 0.1).abs() < f64::EPSILON);
    }
}
