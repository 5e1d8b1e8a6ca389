// file: src/pipeline/progress.rs
// description: progress tracking for per-chunk model calls
// reference: uses indicatif for progress bars and tracks call counters

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressSnapshot {
    pub chunks_total: usize,
    pub chunks_completed: usize,
    pub chunks_failed: usize,
    pub chars_generated: usize,
    pub elapsed_ms: u64,
}

impl ProgressSnapshot {
    pub fn is_complete(&self) -> bool {
        self.chunks_total > 0 && self.chunks_completed + self.chunks_failed >= self.chunks_total
    }
}

pub struct ProgressTracker {
    bar: ProgressBar,
    chunks_total: AtomicUsize,
    chunks_completed: AtomicUsize,
    chunks_failed: AtomicUsize,
    chars_generated: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(colored: bool) -> Self {
        Self::with_bar(create_progress_bar(colored))
    }

    /// A tracker that counts but never draws.
    pub fn hidden() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            chunks_total: AtomicUsize::new(0),
            chunks_completed: AtomicUsize::new(0),
            chunks_failed: AtomicUsize::new(0),
            chars_generated: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn set_stage(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    pub fn start_chunks(&self, total: usize) {
        self.chunks_total.store(total, Ordering::SeqCst);
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(format!("Summarizing {} chunk(s)", total));
    }

    pub fn chunk_completed(&self, generated_chars: usize) {
        self.chunks_completed.fetch_add(1, Ordering::SeqCst);
        self.chars_generated.fetch_add(generated_chars, Ordering::SeqCst);
        self.bar.inc(1);
    }

    pub fn chunk_failed(&self) {
        self.chunks_failed.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
    }

    /// Clears the bar after a complete run; an interrupted run stays visible
    /// at the position it reached.
    pub fn finish(&self) {
        if self.bar.is_finished() {
            return;
        }
        if self.snapshot().is_complete() {
            self.bar.finish_and_clear();
        } else {
            self.bar.abandon();
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            chunks_total: self.chunks_total.load(Ordering::SeqCst),
            chunks_completed: self.chunks_completed.load(Ordering::SeqCst),
            chunks_failed: self.chunks_failed.load(Ordering::SeqCst),
            chars_generated: self.chars_generated.load(Ordering::SeqCst),
            elapsed_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(colored: bool) -> ProgressBar {
    let bar = ProgressBar::new(0);
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"
    };

    match ProgressStyle::default_bar().template(template) {
        Ok(style) => {
            let progress_chars = if colored { "█▓▒░" } else { "=>-" };
            bar.set_style(style.progress_chars(progress_chars));
        }
        Err(e) => tracing::debug!("Falling back to default progress style: {}", e),
    }
    bar
}
